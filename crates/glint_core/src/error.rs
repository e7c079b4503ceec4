//! Errors raised while loading and validating a scene description.

use thiserror::Error;

/// Errors that can occur while turning a scene file into render input.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{owner} references material {index}, but only {count} materials are defined")]
    MissingMaterial {
        owner: String,
        index: usize,
        count: usize,
    },

    #[error("Mesh {mesh} references vertex {index}, but has only {count} vertices")]
    VertexOutOfRange {
        mesh: usize,
        index: usize,
        count: usize,
    },

    #[error("Mesh {mesh} has {count} indices, which is not a multiple of 3")]
    RaggedIndices { mesh: usize, count: usize },

    #[error("Mesh {mesh} has no triangles")]
    EmptyMesh { mesh: usize },

    #[error("{name} must be non-negative, got {value}")]
    NegativeEpsilon { name: &'static str, value: f32 },
}

pub type SceneResult<T> = Result<T, SceneError>;
