use uuid::Uuid;

/// Generates prefixed unique identifiers for records created by the engine
/// itself (today: edges inserted through
/// [`TopologyEngine::connect`](crate::engine::TopologyEngine::connect)).
///
/// Application-supplied ids are always preferred; the generator only covers
/// the cases where the caller has none.
#[derive(Clone, Debug)]
pub struct IdGenerator {
    prefix: String,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// A new unique id of the form `<prefix>-<uuid>`.
    #[must_use]
    pub fn generate(&self) -> String {
        format!("{}-{}", self.prefix, Uuid::new_v4())
    }
}
