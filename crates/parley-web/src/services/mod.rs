mod relay;

pub use relay::{ui_message_stream, RelayService, RelayState};
