//! Checklist hierarchy codec
//!
//! Flattens a note's checklist into order-preserving wire records and
//! reconstructs item trees from client-supplied flat input. Pure functions
//! over the model types; the store client applies the results.

mod codec;

pub use codec::{
    apply_update, plan_list, serialize_items, validate_parent, ListPlan, NewListItem,
    SerializedItem,
};
