//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → request.rs (absolute request URL from URI, Host, x-forwarded-proto)
//!     → middleware.rs (extract locale, de-localize URI, bind RequestContext)
//!     → handler (sees RequestLocale extension and the bound context)
//!     → middleware.rs (Content-Language on the way out)
//!     → response.rs (LocaleError → status code)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{locale_middleware, RequestLocale};
pub use server::HttpServer;
