//! Named-entity recognition and person-name extraction.
//!
//! Tags each word of a sentence with an entity group (`PER`, `LOC`, `ORG`, `MISC`) and
//! collapses consecutive words of the same group into spans.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sentiment_service::ner::{NerPipelineBuilder, BertNerSize};
//!
//! # fn main() -> sentiment_service::error::Result<()> {
//! let pipeline = NerPipelineBuilder::bert(BertNerSize::Base).build()?;
//!
//! let output = pipeline.run("I'm General House from Washington, howdy.")?;
//! for entity in &output.entities {
//!     println!("{}: {} ({:.2})", entity.group, entity.text, entity.score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Name Extraction
//!
//! [`NerPipeline::extract_name`] returns the first person span. Sentences with several
//! people yield only the first one; sentences with none fail with
//! [`PipelineError::NameNotFound`](crate::error::PipelineError::NameNotFound).
//!
//! ```rust,no_run
//! # use sentiment_service::ner::{NerPipelineBuilder, BertNerSize};
//! use sentiment_service::error::PipelineError;
//! # fn main() -> sentiment_service::error::Result<()> {
//! # let pipeline = NerPipelineBuilder::bert(BertNerSize::Base).build()?;
//! match pipeline.extract_name("Sorry, I didn't get that?") {
//!     Ok(name) => println!("hello {name}"),
//!     Err(PipelineError::NameNotFound(_)) => println!("no name found"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod entities;
pub(crate) mod model;
pub(crate) mod pipeline;

// ============ Public API ============

pub use crate::models::{BertNerSize, ModelId};
pub use crate::pipelines::stats::PipelineStats;
pub use builder::NerPipelineBuilder;
pub use entities::Entity;
pub use pipeline::{first_person, NameExtractor, NerPipeline, Output};

/// Only for generic annotations. Use [`NerPipelineBuilder::bert`].
pub type NerBert = crate::models::bert::NerBertModel;
