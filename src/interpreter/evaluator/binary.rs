/// Operator dispatch and the binary expression entry point.
pub mod core;

/// Arithmetic, bitwise and shift operators on integers and floats.
pub mod scalar;

/// Equality and relational operators.
pub mod comparison;

/// Logical operators on booleans.
pub mod logic;
