//! Navigation context for the version/language switcher.
//!
//! Builds the metadata a documentation template needs to link every
//! published version and every language of the version being rendered,
//! and renders the default switcher fragment.

pub mod context;
pub mod switcher;

pub use context::{
    build_context, ContextError, ContextOptions, ContextRequest, DedupKey, Link,
    NavigationContext, PagesRootDefault, VersionName, Versions,
};
pub use switcher::SwitcherRenderer;
