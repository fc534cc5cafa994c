use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Верхнеуровневый тип ошибок крейта
#[derive(Debug, Error)]
pub enum TariffError {
    /// Некорректное значение в сеттере
    #[error("invalid parameter {param}: {reason}")]
    InvalidParameter {
        /// имя параметра
        param: &'static str,
        /// что не так
        reason: String,
    },

    /// Тип отправления не поддерживается
    #[error("unsupported shipment type: {0}")]
    UnsupportedShipmentType(String),

    /// Страна не найдена в справочнике
    #[error("destination not found: {0}")]
    InvalidDestination(String),

    /// Страна есть, но нужного поля у неё нет
    #[error("destination {destination} has no {field}")]
    UnsupportedDestination {
        /// как страна была указана
        destination: String,
        /// отсутствующее поле справочника
        field: &'static str,
    },

    /// Справочник стран не загружен
    #[error("country reference data is not loaded; only numeric country codes are accepted")]
    MissingReferenceData,

    /// Обязательное поле запроса не задано
    #[error("required field is not set: {0}")]
    MissingRequiredField(RequiredField),

    /// Сервис вернул `error`
    #[error("remote error: {0}")]
    RemoteError(String),

    /// В ответе нет ожидаемого ключа
    #[error("response field is missing: {0}")]
    MissingField(String),

    /// Ответ не похож на JSON-объект или поле имеет неверный тип
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Ошибка транспорта
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Справочник есть, но прочитать его не удалось
    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),
}

/// Поля, без которых ссылку не собрать
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    /// тип отправления
    ShipmentType,
    /// вес
    Weight,
    /// пункт назначения
    Destination,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequiredField::ShipmentType => "shipment type",
            RequiredField::Weight => "weight",
            RequiredField::Destination => "destination",
        };
        f.write_str(name)
    }
}

/// Ошибка внешнего HTTP-коллаборатора
#[derive(Debug, Error)]
#[error("request to {url} failed: {message}")]
pub struct FetchError {
    /// адрес запроса
    pub url: String,
    /// описание ошибки
    pub message: String,
}

impl FetchError {
    /// Создаёт ошибку для адреса `url`
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Ошибки чтения справочника стран
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    /// Ошибка ввода-вывода
    #[error("failed to read country file {path:?}")]
    Io {
        /// путь к файлу
        path: PathBuf,
        /// исходная ошибка
        #[source]
        source: std::io::Error,
    },

    /// Файл не является массивом стран
    #[error("failed to parse country data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Результат операций крейта
pub type Result<T> = std::result::Result<T, TariffError>;
