/// Адрес сервиса расчёта тарифов по умолчанию
pub const DEFAULT_BASE_URL: &str = "http://tariff.russianpost.ru/tariff/v1/calculate?json";

/// Имя справочника стран по умолчанию
pub const DEFAULT_COUNTRIES_FILE: &str = "country.json";

/// Код объекта "посылка с объявленной ценностью"
pub const OBJECT_PACKAGE_DECLARED_VALUE: u32 = 4021;

/// Код объекта EMS
pub const OBJECT_EMS: u32 = 7031;

/// Значение `service` для EMS
pub const EMS_SERVICE: u32 = 10;

/// Значение `isavia`, которое уходит в запрос, если авиадоставка включена
pub const AVIA_ENABLED: u8 = 2;

/// Формат параметра `date`
pub const DATE_FORMAT: &str = "%Y%m%d";
