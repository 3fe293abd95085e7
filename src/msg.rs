/// Messages that drive the serve loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// One raw line read from the client, without its trailing newline.
    Frame(Vec<u8>),
    /// The input side failed; the loop stops after reporting it.
    ReadFailed(String),
    /// End of input.
    Closed,
}
