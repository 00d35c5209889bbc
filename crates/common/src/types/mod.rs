use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    /// Records currently held by the store.
    pub coasters: usize,
}
