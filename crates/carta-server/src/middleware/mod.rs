//! Middleware stack para el servidor HTTP.
//!
//! - request id: genera/propaga `x-request-id`
//! - trazas: un span `http_request` por request con el request id

mod request_id;

pub use request_id::{
    REQUEST_ID_HEADER, UuidRequestId, propagate_request_id_layer, set_request_id_layer,
};
