//! # rollcall-network
//!
//! HTTP adapter for the recognition/registration backend.
//! Implements the `RecognitionApi` port with reqwest.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rollcall_network::http_client::HttpRecognitionClient;
//!
//! let client = HttpRecognitionClient::new("http://localhost:5000", timeout)?;
//! ```

pub mod http_client;
