//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attributes. `Money` is
/// the canonical example here: arithmetic returns a new value instead of
/// mutating the receiver, so values can be shared freely across threads.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
