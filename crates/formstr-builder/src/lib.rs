#![allow(missing_docs)]

pub mod builder;
pub mod config;
pub mod context;
pub mod drafts;
pub mod filler;
pub mod publish;
pub mod save;
pub mod store;

pub use builder::{
    BuilderOptions, BuilderTab, DEFAULT_FORM_NAME, DraftError, FormBuilder, RelayEntry,
    ScrollRequest,
};
pub use config::{BuilderConfig, CONFIG_FILE_NAME, ConfigError, DEFAULT_RELAYS};
pub use context::{BuilderContext, BuilderError};
pub use drafts::{DRAFT_FORMS_KEY, delete_draft, load_drafts, store_draft};
pub use filler::{
    Banner, FillerError, FillerExit, FillerOptions, FillerSession, FormSource, Response,
    SourceError, SubmitReceipt,
};
pub use publish::{FormPublisher, PublishArtifacts, PublishError, PublishRequest, RelayCallback};
pub use save::{DASHBOARD_PATH, DashboardRoute, DashboardState, SaveError, SaveTicket};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
