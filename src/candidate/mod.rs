//! Corner candidate selection and pruning utilities.
//!
//! Includes the global response-ranked Top-K and per-level non-maximum
//! suppression on the corner response map.

pub(crate) mod nms;
pub(crate) mod topk;
