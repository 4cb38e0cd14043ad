use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LayerId(pub &'static str);

pub trait Layer {
    fn id(&self) -> LayerId;

    /// Whether the layer answers pick queries.
    fn pickable(&self) -> bool {
        false
    }
}
