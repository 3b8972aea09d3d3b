//! # hmc-rs #
//!
//! Hypermedia controls: typed descriptions of the interaction points a server offers
//! (text inputs, selects, open-ended maps, links, submit buttons), analogous to HTML form
//! elements but independent of any transport or markup.
//!
//! Each control knows how to
//! - populate itself from decoded `application/x-www-form-urlencoded` data ([`Extract`]),
//! - check itself against a minimal, browser-like rule set (`validate`),
//! - render itself as JSON (`serde::Serialize`) and as an XML dialect ([`ToXml`]) from the
//!   very same state. Password values are masked and unset constraints omitted in both.
//!
//! # Decode, validate, render #
//! ```rust
//! use hmc_rs::{Extract, FormValues, Input, Map, Renderer, Config, Format, ToXml, XmlWriter};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Login {
//!     username: Input,
//!     password: Input,
//!     misc: Map,
//! }
//!
//! impl ToXml for Login {
//!     fn write_xml<W: std::io::Write>(&self, w: &mut XmlWriter<W>) -> Result<(), hmc_rs::HmcError> {
//!         w.write(&self.username)?;
//!         w.write(&self.password)?;
//!         w.write(&self.misc)
//!     }
//! }
//!
//! let mut login = Login {
//!     username: Input { required: true, ..Input::new("username") },
//!     password: Input { kind: "password".into(), ..Input::new("password") },
//!     misc: Map::bucket(),
//! };
//! let mut form = FormValues::parse("username=john&password=hunter2&theme=dark");
//! login.username.extract(&mut form);
//! login.password.extract(&mut form);
//! // The catch-all goes last
//! login.misc.extract(&mut form);
//! assert!(form.is_empty());
//! assert!(login.username.validate().is_none());
//!
//! let renderer = Renderer::new(&Config::default());
//! let json = renderer.render(Format::Json, "login", &login).unwrap();
//! assert!(json.contains(r#""value":"********""#));
//! let xml = renderer.render(Format::Xml, "login", &login).unwrap();
//! assert!(xml.starts_with("<login xmlns:c="));
//! ```
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod form;
pub mod input;
pub mod json;
pub mod link;
pub mod map;
pub mod render;
pub mod select;
pub mod submit;
pub mod values;
pub mod xml;

pub use config::Config;
pub use error::{FailureKind, HmcError, ValidationFailure};
pub use form::Form;
pub use input::Input;
pub use link::Link;
pub use map::Map;
pub use render::{Format, Renderer};
pub use select::{Select, SelectOption};
pub use submit::Submit;
pub use values::{Extract, FormValues};
pub use xml::{Element, Namespace, ToXml, XmlSerializer, XmlWriter, to_xml_document};
