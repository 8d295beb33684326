//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values - a
/// `TimeWindow` or a recorded `StockMovement` with the same fields is the
/// same value, wherever it came from. Entities, in contrast, are the same
/// entity only when their IDs match.
///
/// To "modify" a value object, create a new one with the new values. This
/// keeps them safe to share and lets them behave like primitives.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
