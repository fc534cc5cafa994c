use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use log::debug;

use crate::constants::{
    AVIA_ENABLED, DATE_FORMAT, DEFAULT_BASE_URL, EMS_SERVICE, OBJECT_EMS,
    OBJECT_PACKAGE_DECLARED_VALUE,
};
use crate::country::CountryTable;
use crate::destination;
use crate::error::{RequiredField, Result, TariffError};

/// Значение, пришедшее в сеттер из нетипизированного источника (CLI, конфиг).
///
/// Текст, который разбирается как число, считается числом.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// `true` / `false`
    Bool(bool),
    /// целое
    Int(i64),
    /// дробное
    Float(f64),
    /// строка
    Text(String),
}

impl ParamValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Bool(_) => None,
            ParamValue::Int(n) => Some(*n as f64),
            ParamValue::Float(f) => Some(*f).filter(|f| f.is_finite()),
            ParamValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        }
    }

    fn as_integer(&self) -> Option<i64> {
        if let ParamValue::Int(n) = self {
            return Some(*n);
        }
        self.as_number()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<ShipmentType> for ParamValue {
    fn from(v: ShipmentType) -> Self {
        ParamValue::Int(v.code().into())
    }
}

/// Поддерживаемые типы отправлений
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentType {
    /// посылка с объявленной ценностью (4021)
    PackageDeclaredValue,
    /// EMS (7031)
    Ems,
}

impl ShipmentType {
    /// Код объекта для параметра `object`
    pub fn code(self) -> u32 {
        match self {
            ShipmentType::PackageDeclaredValue => OBJECT_PACKAGE_DECLARED_VALUE,
            ShipmentType::Ems => OBJECT_EMS,
        }
    }
}

impl fmt::Display for ShipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipmentType::PackageDeclaredValue => f.write_str("PackageDeclaredValue"),
            ShipmentType::Ems => f.write_str("EMS"),
        }
    }
}

impl TryFrom<u32> for ShipmentType {
    type Error = TariffError;

    fn try_from(code: u32) -> Result<Self> {
        match code {
            OBJECT_PACKAGE_DECLARED_VALUE => Ok(ShipmentType::PackageDeclaredValue),
            OBJECT_EMS => Ok(ShipmentType::Ems),
            other => Err(TariffError::UnsupportedShipmentType(other.to_string())),
        }
    }
}

impl FromStr for ShipmentType {
    type Err = TariffError;

    /// Имя (`PackageDeclaredValue`, `pakageDeclareValue`, `EMS`) без учёта регистра или код
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u32>() {
            return Self::try_from(code);
        }
        match s.to_ascii_lowercase().as_str() {
            "packagedeclaredvalue" | "pakagedeclarevalue" => Ok(ShipmentType::PackageDeclaredValue),
            "ems" => Ok(ShipmentType::Ems),
            _ => Err(TariffError::UnsupportedShipmentType(s.to_string())),
        }
    }
}

/// Параметры одного запроса к сервису тарифов.
///
/// Сеттеры проверяют значение сразу; обязательные поля проверяются при сборке ссылки.
///
/// ```rust
/// use tariff_core::{RequestSpec, ShipmentType};
///
/// let mut spec = RequestSpec::new();
/// spec.set_shipment_type(ShipmentType::Ems)?
///     .set_weight(1500)?
///     .set_destination(840, None)?
///     .clear_date();
/// assert_eq!(spec.query_string()?, "object=7031&service=10&weight=1500&country=840");
/// # Ok::<(), tariff_core::TariffError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    base_url: String,
    avia: Option<u8>,
    weight_grams: Option<f64>,
    declared_value_kopecks: Option<u64>,
    shipment_type: Option<ShipmentType>,
    destination: Option<u32>,
    date: Option<NaiveDate>,
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSpec {
    /// Пустой запрос на сегодняшнюю дату
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            avia: None,
            weight_grams: None,
            declared_value_kopecks: None,
            shipment_type: None,
            destination: None,
            date: Some(Local::now().date_naive()),
        }
    }

    /// Авиадоставка: число 0/1/2 или `true` (= 2).
    pub fn set_avia(&mut self, value: impl Into<ParamValue>) -> Result<&mut Self> {
        let value = value.into();
        let avia = match &value {
            ParamValue::Bool(true) => AVIA_ENABLED,
            ParamValue::Bool(false) => {
                return Err(invalid("avia", "expected true or a number 0/1/2"));
            }
            other => other
                .as_integer()
                .and_then(|n| u8::try_from(n).ok())
                .filter(|n| *n <= AVIA_ENABLED)
                .ok_or_else(|| invalid("avia", format!("expected true or 0/1/2, got {value}")))?,
        };
        self.avia = Some(avia);
        Ok(self)
    }

    /// Вес в граммах
    pub fn set_weight(&mut self, value: impl Into<ParamValue>) -> Result<&mut Self> {
        let value = value.into();
        let grams = value
            .as_number()
            .ok_or_else(|| invalid("weight", format!("expected weight in grams, got {value}")))?;
        if grams <= 0.0 {
            return Err(invalid("weight", format!("must be positive, got {value}")));
        }
        self.weight_grams = Some(grams);
        Ok(self)
    }

    /// Объявленная ценность в рублях; хранится в копейках
    pub fn set_declared_value(&mut self, value: impl Into<ParamValue>) -> Result<&mut Self> {
        let value = value.into();
        let rubles = value.as_number().ok_or_else(|| {
            invalid("declared value", format!("expected amount in rubles, got {value}"))
        })?;
        if rubles < 0.0 {
            return Err(invalid("declared value", format!("must not be negative, got {value}")));
        }
        let kopecks = (rubles * 100.0).round();
        if kopecks >= u64::MAX as f64 {
            return Err(invalid("declared value", format!("amount is too large: {value}")));
        }
        self.declared_value_kopecks = Some(kopecks as u64);
        Ok(self)
    }

    /// Тип отправления: имя или код
    pub fn set_shipment_type(&mut self, value: impl Into<ParamValue>) -> Result<&mut Self> {
        let value = value.into();
        let ty = match &value {
            ParamValue::Text(s) => s.parse()?,
            other => other
                .as_integer()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| TariffError::UnsupportedShipmentType(value.to_string()))
                .and_then(ShipmentType::try_from)?,
        };
        self.shipment_type = Some(ty);
        Ok(self)
    }

    /// Пункт назначения: код страны или название/код из справочника
    pub fn set_destination(
        &mut self,
        value: impl Into<ParamValue>,
        table: Option<&CountryTable>,
    ) -> Result<&mut Self> {
        let code = match value.into() {
            ParamValue::Text(token) => destination::resolve(&token, table)?,
            ParamValue::Bool(b) => {
                return Err(invalid("destination", format!("expected country, got {b}")));
            }
            other => other
                .as_integer()
                .and_then(|n| u32::try_from(n).ok())
                .filter(|n| *n > 0)
                .ok_or_else(|| TariffError::InvalidDestination(other.to_string()))?,
        };
        self.destination = Some(code);
        Ok(self)
    }

    /// Дата расчёта
    pub fn set_date(&mut self, date: NaiveDate) -> &mut Self {
        self.date = Some(date);
        self
    }

    /// Не передавать дату: сервис посчитает на текущую
    pub fn clear_date(&mut self) -> &mut Self {
        self.date = None;
        self
    }

    /// Адрес сервиса
    pub fn set_base_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.base_url = url.into();
        self
    }

    /// Адрес сервиса
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Значение авиадоставки, как было задано
    pub fn avia(&self) -> Option<u8> {
        self.avia
    }

    /// Вес в граммах
    pub fn weight_grams(&self) -> Option<f64> {
        self.weight_grams
    }

    /// Объявленная ценность в копейках
    pub fn declared_value_kopecks(&self) -> Option<u64> {
        self.declared_value_kopecks
    }

    /// Тип отправления
    pub fn shipment_type(&self) -> Option<ShipmentType> {
        self.shipment_type
    }

    /// Цифровой код страны назначения
    pub fn destination(&self) -> Option<u32> {
        self.destination
    }

    /// Дата расчёта
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Параметры запроса в порядке, который ожидает сервис
    pub fn query_string(&self) -> Result<String> {
        let ty = self
            .shipment_type
            .ok_or(TariffError::MissingRequiredField(RequiredField::ShipmentType))?;

        let mut params: Vec<(&str, String)> = vec![("object", ty.code().to_string())];

        match ty {
            ShipmentType::PackageDeclaredValue => {
                if self.avia.is_some_and(|a| a != 0) {
                    params.push(("isavia", AVIA_ENABLED.to_string()));
                }
                // нулевую ценность сервис не ждёт
                if let Some(kopecks) = self.declared_value_kopecks.filter(|k| *k > 0) {
                    params.push(("sumoc", kopecks.to_string()));
                }
            }
            ShipmentType::Ems => params.push(("service", EMS_SERVICE.to_string())),
        }

        let weight = self
            .weight_grams
            .ok_or(TariffError::MissingRequiredField(RequiredField::Weight))?;
        params.push(("weight", format_number(weight)));

        let country = self
            .destination
            .ok_or(TariffError::MissingRequiredField(RequiredField::Destination))?;
        params.push(("country", country.to_string()));

        if let Some(date) = self.date {
            params.push(("date", date.format(DATE_FORMAT).to_string()));
        }

        Ok(params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&"))
    }

    /// Полная ссылка запроса
    pub fn build_url(&self) -> Result<String> {
        let query = self.query_string()?;
        let base = self.base_url.as_str();
        let url = if base.ends_with('?') || base.ends_with('&') {
            format!("{base}{query}")
        } else if base.contains('?') {
            format!("{base}&{query}")
        } else {
            format!("{base}?{query}")
        };
        debug!("built url: {url}");
        Ok(url)
    }
}

fn invalid(param: &'static str, reason: impl Into<String>) -> TariffError {
    TariffError::InvalidParameter {
        param,
        reason: reason.into(),
    }
}

// 1500.0 -> "1500", 1500.5 -> "1500.5"
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::tests::sample_table;

    fn jan_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn package_url_has_fixed_parameter_order() {
        let table = sample_table();
        let mut spec = RequestSpec::new();
        spec.set_avia(true)
            .unwrap()
            .set_weight(1500)
            .unwrap()
            .set_destination("США", Some(&table))
            .unwrap()
            .set_declared_value(15500)
            .unwrap()
            .set_shipment_type("PackageDeclaredValue")
            .unwrap()
            .set_date(jan_first());

        assert_eq!(
            spec.query_string().unwrap(),
            "object=4021&isavia=2&sumoc=1550000&weight=1500&country=840&date=20240101"
        );
        assert_eq!(
            spec.build_url().unwrap(),
            "http://tariff.russianpost.ru/tariff/v1/calculate?json\
             &object=4021&isavia=2&sumoc=1550000&weight=1500&country=840&date=20240101"
        );
    }

    #[test]
    fn ems_url_omits_avia_and_sumoc() {
        let mut spec = RequestSpec::new();
        spec.set_shipment_type("EMS")
            .unwrap()
            .set_avia(2)
            .unwrap()
            .set_declared_value(100)
            .unwrap()
            .set_weight(800)
            .unwrap()
            .set_destination(276, None)
            .unwrap()
            .set_date(jan_first());

        assert_eq!(
            spec.query_string().unwrap(),
            "object=7031&service=10&weight=800&country=276&date=20240101"
        );
    }

    #[test]
    fn package_without_avia_and_value() {
        let mut spec = RequestSpec::new();
        spec.set_shipment_type(4021)
            .unwrap()
            .set_avia(0)
            .unwrap()
            .set_weight("250.5")
            .unwrap()
            .set_destination("840", None)
            .unwrap()
            .clear_date();

        assert_eq!(spec.query_string().unwrap(), "object=4021&weight=250.5&country=840");
    }

    #[test]
    fn zero_declared_value_is_not_sent() {
        let mut spec = RequestSpec::new();
        spec.set_shipment_type(ShipmentType::PackageDeclaredValue)
            .unwrap()
            .set_declared_value(0)
            .unwrap()
            .set_weight(100)
            .unwrap()
            .set_destination(840, None)
            .unwrap()
            .clear_date();

        assert_eq!(spec.declared_value_kopecks(), Some(0));
        assert_eq!(spec.query_string().unwrap(), "object=4021&weight=100&country=840");

        spec.set_declared_value("0.01").unwrap();
        assert_eq!(
            spec.query_string().unwrap(),
            "object=4021&sumoc=1&weight=100&country=840"
        );
    }

    #[test]
    fn any_truthy_avia_sends_two() {
        let mut spec = RequestSpec::new();
        spec.set_shipment_type(ShipmentType::PackageDeclaredValue)
            .unwrap()
            .set_avia(1)
            .unwrap()
            .set_weight(1)
            .unwrap()
            .set_destination(1, None)
            .unwrap()
            .clear_date();
        assert_eq!(spec.avia(), Some(1));
        assert_eq!(spec.query_string().unwrap(), "object=4021&isavia=2&weight=1&country=1");
    }

    #[test]
    fn missing_required_fields_are_reported_distinctly() {
        let mut spec = RequestSpec::new();
        assert!(matches!(
            spec.build_url().unwrap_err(),
            TariffError::MissingRequiredField(RequiredField::ShipmentType)
        ));

        spec.set_shipment_type("ems").unwrap();
        assert!(matches!(
            spec.build_url().unwrap_err(),
            TariffError::MissingRequiredField(RequiredField::Weight)
        ));

        spec.set_weight(10).unwrap();
        assert!(matches!(
            spec.build_url().unwrap_err(),
            TariffError::MissingRequiredField(RequiredField::Destination)
        ));

        spec.set_destination(840, None).unwrap();
        assert!(spec.build_url().is_ok());
    }

    #[test]
    fn avia_validation() {
        let mut spec = RequestSpec::new();
        assert_eq!(spec.set_avia(true).unwrap().avia(), Some(2));
        assert_eq!(spec.set_avia("1").unwrap().avia(), Some(1));

        for bad in [ParamValue::Bool(false), "yes".into(), 3.into(), (-1).into(), 1.5.into()] {
            let err = spec.set_avia(bad.clone()).unwrap_err();
            assert!(
                matches!(err, TariffError::InvalidParameter { param: "avia", .. }),
                "{bad}"
            );
        }
    }

    #[test]
    fn weight_and_value_validation() {
        let mut spec = RequestSpec::new();
        assert!(matches!(
            spec.set_weight("heavy").unwrap_err(),
            TariffError::InvalidParameter { param: "weight", .. }
        ));
        assert!(matches!(
            spec.set_weight(true).unwrap_err(),
            TariffError::InvalidParameter { param: "weight", .. }
        ));
        assert!(spec.set_weight(0).is_err());
        assert!(spec.set_weight(f64::NAN).is_err());
        assert_eq!(spec.weight_grams(), None);

        assert!(matches!(
            spec.set_declared_value("много").unwrap_err(),
            TariffError::InvalidParameter { param: "declared value", .. }
        ));
        assert!(spec.set_declared_value(-1).is_err());

        spec.set_declared_value("10.5").unwrap();
        assert_eq!(spec.declared_value_kopecks(), Some(1050));
        spec.set_declared_value(0.29).unwrap();
        assert_eq!(spec.declared_value_kopecks(), Some(29));
    }

    #[test]
    fn huge_declared_value_is_rejected() {
        let mut spec = RequestSpec::new();
        spec.set_declared_value(15500).unwrap();

        for bad in [ParamValue::from("1e300"), i64::MAX.into(), f64::MAX.into()] {
            let err = spec.set_declared_value(bad.clone()).unwrap_err();
            assert!(
                matches!(err, TariffError::InvalidParameter { param: "declared value", .. }),
                "{bad}"
            );
        }
        // прежнее значение остаётся
        assert_eq!(spec.declared_value_kopecks(), Some(1_550_000));

        spec.set_declared_value(1_000_000_000).unwrap();
        assert_eq!(spec.declared_value_kopecks(), Some(100_000_000_000));
    }

    #[test]
    fn shipment_type_parsing() {
        for s in ["PackageDeclaredValue", "pakageDeclareValue", "4021"] {
            assert_eq!(s.parse::<ShipmentType>().unwrap(), ShipmentType::PackageDeclaredValue);
        }
        for s in ["EMS", "ems", "7031"] {
            assert_eq!(s.parse::<ShipmentType>().unwrap(), ShipmentType::Ems);
        }

        let mut spec = RequestSpec::new();
        for bad in [ParamValue::from("Letter"), 4020.into(), true.into(), (-7031).into()] {
            let err = spec.set_shipment_type(bad.clone()).unwrap_err();
            assert!(matches!(err, TariffError::UnsupportedShipmentType(_)), "{bad}");
        }
        assert_eq!(spec.shipment_type(), None);
    }

    #[test]
    fn destination_setter_delegates_to_resolver() {
        let table = sample_table();
        let mut spec = RequestSpec::new();

        spec.set_destination("DEU", Some(&table)).unwrap();
        assert_eq!(spec.destination(), Some(276));

        assert!(matches!(
            spec.set_destination("Germany", None).unwrap_err(),
            TariffError::MissingReferenceData
        ));
        assert!(matches!(
            spec.set_destination(0, None).unwrap_err(),
            TariffError::InvalidDestination(_)
        ));
        assert!(matches!(
            spec.set_destination(false, None).unwrap_err(),
            TariffError::InvalidParameter { .. }
        ));
        // предыдущее значение не затирается ошибкой
        assert_eq!(spec.destination(), Some(276));
    }

    #[test]
    fn typed_and_text_numeric_destinations_agree() {
        let mut spec = RequestSpec::new();
        for value in [ParamValue::from(840.0), "840.0".into(), 840.into(), "0840".into()] {
            spec.set_destination(value.clone(), None).unwrap();
            assert_eq!(spec.destination(), Some(840), "{value}");
        }
        for value in [ParamValue::from(840.5), "840.5".into()] {
            assert!(matches!(
                spec.set_destination(value, None).unwrap_err(),
                TariffError::InvalidDestination(_)
            ));
        }
    }

    #[test]
    fn new_spec_carries_today() {
        let spec = RequestSpec::new();
        assert_eq!(spec.date(), Some(Local::now().date_naive()));
        assert_eq!(spec.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn base_url_join() {
        let mut spec = RequestSpec::new();
        spec.set_shipment_type("EMS")
            .unwrap()
            .set_weight(1)
            .unwrap()
            .set_destination(1, None)
            .unwrap()
            .clear_date();

        spec.set_base_url("http://localhost/calc");
        assert_eq!(
            spec.build_url().unwrap(),
            "http://localhost/calc?object=7031&service=10&weight=1&country=1"
        );
        spec.set_base_url("http://localhost/calc?");
        assert_eq!(
            spec.build_url().unwrap(),
            "http://localhost/calc?object=7031&service=10&weight=1&country=1"
        );
    }
}
