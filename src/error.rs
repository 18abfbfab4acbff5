//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.
//!
//! The congestion hooks themselves are total and never fail; these errors
//! belong to the surfaces around them (registry, tunables, module loading).

use std::num::ParseIntError;
use thiserror::Error;

/// The primary error type for the congestion control library.
/// 拥塞控制库的主要错误类型。
#[derive(Debug, Error)]
pub enum Error {
    /// An algorithm with the same name is already present in the registry.
    /// 注册表中已存在同名算法。
    #[error("congestion control algorithm `{0}` is already registered")]
    AlgorithmExists(String),

    /// No algorithm is registered under the requested name.
    /// 请求的名称下没有注册任何算法。
    #[error("congestion control algorithm `{0}` is not registered")]
    UnknownAlgorithm(String),

    /// The tunable table has no entry with the requested name.
    /// 可调参数表中没有请求名称的条目。
    #[error("unknown tunable parameter `{0}`")]
    UnknownParameter(String),

    /// A textual write to a tunable could not be parsed as an unsigned 32-bit integer.
    /// 对可调参数的文本写入无法解析为32位无符号整数。
    #[error("invalid value `{value}` for tunable `{name}`: {source}")]
    InvalidParameterValue {
        name: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;
        let kind = match &err {
            Error::AlgorithmExists(_) => ErrorKind::AlreadyExists,
            Error::UnknownAlgorithm(_) => ErrorKind::NotFound,
            Error::UnknownParameter(_) => ErrorKind::NotFound,
            Error::InvalidParameterValue { .. } => ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, err)
    }
}
