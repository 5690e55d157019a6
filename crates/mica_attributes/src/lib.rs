//! The attribute pipeline: a process-wide name/id interner, per-attribute
//! handlers (preprocess/postprocess/cache), composite assembly, multi-owner
//! value resolution, and transaction-scoped application.

pub mod bound;
pub mod composite;
pub mod error;
pub mod handler;
pub mod ids;
pub mod node_state;
pub mod preprocessors;
pub mod transaction;
pub mod value;

pub use bound::{AttributeOwner, AttributeValueCollection, BoundAttributes, DirtyTarget};
pub use composite::{Assembler, CompositeAttribute, CompositePart};
pub use error::AttributeError;
pub use handler::{AttributeHandler, Postprocessor, Preprocessor};
pub use ids::{global, AttributeId, AttributeIds, RESERVED_NAMES};
pub use node_state::{AttributeFlags, ViewNodeAttributes};
pub use transaction::{PendingApplication, ViewTransactionScope};
pub use value::{AttributeValue, Border, BoxShadow, Gradient, GradientAngle, PreprocessedValue, TextShadow};
