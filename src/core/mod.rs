pub mod batch;
pub mod decode;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod validate;

pub use crate::domain::model::{
    Assignment, AssignmentOutcome, BatchReport, InvalidReason, InvalidRow, OrderRef, RawRow,
    ValidationOutcome,
};
pub use crate::domain::ports::{BatchPipeline, ConfigProvider, OrderStore, Storage};
pub use crate::utils::error::Result;
