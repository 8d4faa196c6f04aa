//! Socket Layer
//!
//! Room membership protocol. Clients ask to watch a specific order or
//! return, or the aggregate analytics feed, and the server drops them into
//! the matching room. Payloads flow the other way through `SocketNotifier`.

use socketioxide::extract::{Data, SocketRef};
use socketioxide::layer::SocketIoLayer;
use socketioxide::SocketIo;

use shared::Topic;

/// Build the socket.io tower layer and its handle.
pub fn build_socket_layer() -> (SocketIoLayer, SocketIo) {
    let (layer, io) = SocketIo::new_layer();
    io.ns("/", on_connect);
    (layer, io)
}

async fn on_connect(socket: SocketRef) {
    tracing::debug!("Socket connected: {}", socket.id);

    socket.on("join_order", async |socket: SocketRef, Data::<String>(id)| {
        let room = Topic::Order(id.clone()).room();
        let _ = socket.join(room.clone());
        tracing::debug!("Socket {} joined {}", socket.id, room);
    });

    socket.on("leave_order", async |socket: SocketRef, Data::<String>(id)| {
        let _ = socket.leave(Topic::Order(id).room());
    });

    socket.on("join_return", async |socket: SocketRef, Data::<String>(id)| {
        let room = Topic::Return(id.clone()).room();
        let _ = socket.join(room.clone());
        tracing::debug!("Socket {} joined {}", socket.id, room);
    });

    socket.on("leave_return", async |socket: SocketRef, Data::<String>(id)| {
        let _ = socket.leave(Topic::Return(id).room());
    });

    socket.on("join_analytics", async |socket: SocketRef| {
        let _ = socket.join(Topic::Analytics.room());
        tracing::debug!("Socket {} joined analytics", socket.id);
    });

    socket.on("leave_analytics", async |socket: SocketRef| {
        let _ = socket.leave(Topic::Analytics.room());
    });

    socket.on_disconnect(async |socket: SocketRef| {
        tracing::debug!("Socket disconnected: {}", socket.id);
    });
}
