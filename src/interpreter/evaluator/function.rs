/// Call evaluation.
///
/// Evaluates callees and arguments, selects the overload matching the
/// argument kinds, binds parameters by value or by reference and runs script
/// or native bodies.
pub mod core;
