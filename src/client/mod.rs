//! Consumer side of the downstream frame stream.
//!
//! [`ChatReassembler`] rebuilds what a chat UI shows from the bytes of a
//! `POST /api/chat` response: the message list, the agent in charge, the
//! tool feedback of each message and whether tools are still running.

mod reassembly;

pub use reassembly::{ChatReassembler, Message, Role};
