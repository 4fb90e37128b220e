//! Error types raised by shape inference over the graph IR.

use crate::shape::Shape;
use thiserror::Error;

/// Errors that can occur while validating a graph and inferring its output shape.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Operator {op} expects {expected} input(s) but got {actual}")]
    ArityMismatch {
        op: String,
        expected: usize,
        actual: usize,
    },

    #[error("Input '{input}' of operator {op} must have rank {expected} but has rank {actual}")]
    RankMismatch {
        op: String,
        input: String,
        expected: usize,
        actual: usize,
    },

    #[error("Operator {op} requires inputs of identical shape: {left} != {right}")]
    ShapeMismatch { op: String, left: Shape, right: Shape },

    #[error("Operator {op} expects {expected} channels but input '{input}' provides {actual}")]
    ChannelMismatch {
        op: String,
        input: String,
        expected: usize,
        actual: usize,
    },

    #[error("Inner dimensions of {op} do not agree: {left} != {right}")]
    InnerDimensionMismatch { op: String, left: usize, right: usize },

    #[error("Window of size {window} exceeds padded input extent {padded_extent} in operator {op}")]
    WindowExceedsInput {
        op: String,
        window: usize,
        padded_extent: usize,
    },

    #[error("Stride of operator {op} must be greater than 0")]
    ZeroStride { op: String },
}
