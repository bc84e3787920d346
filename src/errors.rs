/*
  Copyright 2017 Takashi Ogura

  Licensed under the Apache License, Version 2.0 (the "License");
  you may not use this file except in compliance with the License.
  You may obtain a copy of the License at

      http://www.apache.org/licenses/LICENSE-2.0

  Unless required by applicable law or agreed to in writing, software
  distributed under the License is distributed on an "AS IS" BASIS,
  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
  See the License for the specific language governing permissions and
  limitations under the License.
*/
use std::io;
use thiserror::Error;

/// The reason of the failure
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The rendering capability could not provide an output surface
    #[error("rendering is unavailable: {reason}")]
    RenderUnavailable { reason: String },
    /// A handle which the engine does not own (or already released) was used
    #[error("unknown {kind} handle: {id}")]
    UnknownHandle { kind: &'static str, id: u64 },
    /// Size of the input vector does not match the degree of freedom
    #[error("size mismatch input = {input}, required = {required}")]
    SizeMismatch { input: usize, required: usize },
    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
