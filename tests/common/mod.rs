// Common test utilities and fixtures

pub mod fakes;
pub mod fixtures;
pub mod helpers;

// Note: These may appear unused in some test crates
#[allow(unused_imports)]
pub use fakes::{FakeEmbedder, FakeStore, RecordingProgress, StoreCall};
#[allow(unused_imports)]
pub use fixtures::TestRepo;
#[allow(unused_imports)]
pub use helpers::{create_test_pipeline, create_test_services, index_test_repository};
