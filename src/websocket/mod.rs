//! WebSocket Real-Time Streaming
//!
//! Pushes every accepted telemetry sample to connected clients as it arrives.
//!
//! ## Usage
//!
//! Clients connect to `/ws` and receive the full feed by default. Sending a
//! subscribe message narrows it to specific categories:
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8080/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'subscribe', categories: ['battery']}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'telemetry') console.log(msg.category, msg.fields);
//! };
//! ```
//!
//! Valid category names: `position`, `attitude`, `battery`, `all` (default).

mod handler;
mod messages;

pub use handler::websocket_handler;
pub use messages::{ClientMessage, ServerMessage};
