/// Core value types.
///
/// Defines the `Value` enum, the shared `Handle` storage cell, deep copying,
/// dictionary key canonicalization and the textual rendering of values.
pub mod core;

/// Function values.
///
/// Overload sets, native and script bodies, forward declarations and
/// overload resolution by argument kinds.
pub mod function;

/// Enums, realms, units and unit instances.
///
/// Member-scoped values and the unit identities used for access control.
pub mod composite;
