//! Vizij Sampled Core
//!
//! Time-keyed sampled values: a sorted sample store with batched merge-insertion,
//! and interpolation over a bounded window of neighbouring samples. Value encoding,
//! time arithmetic and interpolation formulas are pluggable through the
//! [`ValueCodec`], [`OrderedTime`] and [`InterpolationAlgorithm`] traits.

pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod interp;
pub mod property;
pub mod scratch;
pub mod store;
pub mod time;
pub mod window;

// Re-exports for consumers (adapters)
pub use codec::{ArrayCodec, QuatCodec, ScalarCodec, ValueCodec, Vec2Codec, Vec3Codec, Vec4Codec};
pub use config::{Config, ExtrapolationType, InterpolationOptions};
pub use error::SampledError;
pub use events::{ChangeNotifier, PropertyEvent};
pub use ids::SubscriptionId;
pub use interp::{
    AlgorithmRegistry, HermitePolynomialApproximation, InterpolationAlgorithm,
    LagrangePolynomialApproximation, LinearApproximation,
};
pub use property::SampledProperty;
pub use store::{insert_run, MergeReport, SampleStore};
pub use time::{OrderedTime, PackedEntry, SceneTime, TimeToken};
pub use window::{Window, WindowRequest, WindowSelector};

/// Sampled property result type
pub type Result<T> = core::result::Result<T, SampledError>;
