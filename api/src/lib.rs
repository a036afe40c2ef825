// Module layout (Clean Architecture style)
// - bootstrap: configuration, store connection and startup wiring
// - infrastructure: DB/in-memory store adapters and credential hashing
// - presentation: HTTP/WS handlers and routing
// - application: ports and use cases
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
