// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each aggregate gets its own subdirectory with model, errors, validation,
// mapping, and service orchestration. Storage backends and the HTTP surface
// live outside this layer.
//
// ============================================================================

pub mod order;

// Future aggregates can be added here:
// pub mod customer;
