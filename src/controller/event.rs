use crate::error::Result;

/// Discrete input the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A model button; carries the button's id.
    ButtonClicked(String),
    /// A format input; carries the input's id.
    InputChanged(String),
    PointerMoved {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// One requested load: fetch `name`, then hand the bytes back with the same token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub token: u64,
    pub name: String,
}

#[derive(Debug)]
pub struct LoadCompletion {
    pub token: u64,
    pub name: String,
    pub result: Result<Vec<u8>>,
}

impl LoadCompletion {
    pub fn new(ticket: LoadTicket, result: Result<Vec<u8>>) -> Self {
        Self {
            token: ticket.token,
            name: ticket.name,
            result,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer request was issued meanwhile; nothing changed.
    Stale,
}
