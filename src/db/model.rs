//! Row slices returned by repositories.

/// A job removed from the queue by a worker. `kind` stays raw so unknown
/// kinds can be logged and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedJob {
    pub id: i64,
    pub kind: String,
    pub article_id: String,
}
