//! # tariff-core
//!
//! Расчёт стоимости международных отправлений через сервис tariff.russianpost.ru.
//!
//! Этот крейт содержит:
//!
//! - [`country`] — справочник стран (`country.json`) и поиск по нему
//! - [`destination`] — разбор пункта назначения в цифровой код страны
//! - [`request`] — параметры запроса и сборка ссылки
//! - [`response`] — разбор ответа сервиса
//! - [`client`] — клиент: запрос, стоимость, зона EMS и сроки
//! - [`error`] — типы ошибок, которые возвращают компоненты `tariff-core`
//!
//! ## Быстрый пример: сборка ссылки
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tariff_core::{CountryTable, RequestSpec};
//!
//! let table = CountryTable::from_json_str(
//!     r#"[{"ruName": "США", "enName": "United States", "code2": "US", "code3": "USA", "codeNum": 840}]"#,
//! )?;
//!
//! let mut spec = RequestSpec::new();
//! spec.set_avia(true)?
//!     .set_weight(1500)?
//!     .set_destination("США", Some(&table))?
//!     .set_declared_value(15500)?
//!     .set_shipment_type("PackageDeclaredValue")?
//!     .set_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//!
//! assert_eq!(
//!     spec.query_string()?,
//!     "object=4021&isavia=2&sumoc=1550000&weight=1500&country=840&date=20240101"
//! );
//! # Ok::<(), tariff_core::TariffError>(())
//! ```
//!
//! ## Пример: стоимость
//!
//! ```rust
//! use tariff_core::{FetchError, RequestSpec, TariffClient};
//!
//! let client = TariffClient::new(|_url: &str| -> Result<String, FetchError> {
//!     Ok(r#"{"pay": 150000, "paynds": 177000}"#.to_string())
//! });
//!
//! let mut spec = RequestSpec::new();
//! spec.set_shipment_type("EMS")?.set_weight(1500)?.set_destination(840, None)?;
//!
//! assert_eq!(client.cost(&spec, true)?, 1770.0);
//! assert_eq!(client.cost(&spec, false)?, 1500.0);
//! # Ok::<(), tariff_core::TariffError>(())
//! ```
//!
//! ## Дизайн
//!
//! Сеть здесь не реализуется: GET выполняет внешний [`Fetch`]. Справочник стран
//! загружается один раз и дальше только читается, а [`RequestSpec`] принадлежит
//! одному запросу.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Справочник стран.
pub mod country;

/// Разбор пункта назначения: цифровой код, название или буквенный код.
pub mod destination;

/// Параметры запроса и сборка ссылки.
pub mod request;

/// Ответ сервиса.
pub mod response;

/// Клиент сервиса тарифов.
pub mod client;

/// Ошибки `tariff-core`.
pub mod error;

/// Общие константы
pub mod constants;

// --- Re-exports (публичный фасад API) ---

pub use crate::client::{Fetch, TariffClient};
pub use crate::country::{CountryField, CountryRecord, CountryTable};
pub use crate::error::{FetchError, ReferenceDataError, RequiredField, Result, TariffError};
pub use crate::request::{ParamValue, RequestSpec, ShipmentType};
pub use crate::response::TariffResponse;
