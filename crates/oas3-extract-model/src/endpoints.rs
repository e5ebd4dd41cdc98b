use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::models::{Modifier, ModelReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
  Get,
  Put,
  Post,
  Delete,
  Options,
  Head,
  Patch,
  Trace,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method '{0}'")]
pub struct UnsupportedMethod(pub String);

impl TryFrom<&http::Method> for HttpMethod {
  type Error = UnsupportedMethod;

  fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
    match *method {
      http::Method::GET => Ok(Self::Get),
      http::Method::PUT => Ok(Self::Put),
      http::Method::POST => Ok(Self::Post),
      http::Method::DELETE => Ok(Self::Delete),
      http::Method::OPTIONS => Ok(Self::Options),
      http::Method::HEAD => Ok(Self::Head),
      http::Method::PATCH => Ok(Self::Patch),
      http::Method::TRACE => Ok(Self::Trace),
      _ => Err(UnsupportedMethod(method.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ParameterLocation {
  Query,
  Header,
  Path,
  Cookie,
  QueryString,
}

/// Key of a response entry: an exact status code, a class range such as `4XX`, or `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusKey {
  Code(u16),
  Range(u8),
  Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid response status key '{0}'")]
pub struct InvalidStatusKey(pub String);

impl FromStr for StatusKey {
  type Err = InvalidStatusKey;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("default") {
      return Ok(Self::Default);
    }

    let bytes = trimmed.as_bytes();
    if bytes.len() == 3 && bytes[1..].eq_ignore_ascii_case(b"xx") && (b'1'..=b'5').contains(&bytes[0]) {
      return Ok(Self::Range(bytes[0] - b'0'));
    }

    match trimmed.parse::<u16>() {
      Ok(code) if (100..=599).contains(&code) && trimmed.len() == 3 => Ok(Self::Code(code)),
      _ => Err(InvalidStatusKey(s.to_string())),
    }
  }
}

impl fmt::Display for StatusKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Code(code) => write!(f, "{code}"),
      Self::Range(class) => write!(f, "{class}XX"),
      Self::Default => f.write_str("default"),
    }
  }
}

impl Serialize for StatusKey {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointParameter {
  pub name: String,
  pub schema: ModelReference,
  pub location: ParameterLocation,
  pub modifier: Modifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointResponse {
  pub status: StatusKey,
  /// Keyed by media type.
  pub schemas: IndexMap<String, ModelReference>,
}

impl EndpointResponse {
  #[must_use]
  pub fn new(status: StatusKey) -> Self {
    Self {
      status,
      schemas: IndexMap::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
  pub method: HttpMethod,
  pub parameters: IndexMap<String, EndpointParameter>,
  pub request_bodies: IndexMap<String, ModelReference>,
  pub responses: IndexMap<StatusKey, EndpointResponse>,
}

impl Endpoint {
  #[must_use]
  pub fn new(method: HttpMethod) -> Self {
    Self {
      method,
      parameters: IndexMap::new(),
      request_bodies: IndexMap::new(),
      responses: IndexMap::new(),
    }
  }

  /// Every model this endpoint points at, in parameter, request, response order.
  pub fn references(&self) -> impl Iterator<Item = &ModelReference> {
    self
      .parameters
      .values()
      .map(|param| &param.schema)
      .chain(self.request_bodies.values())
      .chain(self.responses.values().flat_map(|response| response.schemas.values()))
  }
}
