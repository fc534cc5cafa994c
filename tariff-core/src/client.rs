use std::sync::Arc;

use log::{debug, info};

use crate::country::{CountryRecord, CountryTable};
use crate::error::{FetchError, RequiredField, Result, TariffError};
use crate::request::RequestSpec;
use crate::response::TariffResponse;

/// Внешний коллаборатор, выполняющий GET-запрос.
///
/// Таймауты, TLS и прочий транспорт — его забота.
pub trait Fetch {
    /// Тело ответа по адресу `url`
    fn get(&self, url: &str) -> std::result::Result<String, FetchError>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> std::result::Result<String, FetchError>,
{
    fn get(&self, url: &str) -> std::result::Result<String, FetchError> {
        self(url)
    }
}

/// Клиент сервиса тарифов.
///
/// Справочник стран общий и неизменяемый, параметры запроса передаются в каждый вызов.
pub struct TariffClient<F> {
    fetcher: F,
    countries: Option<Arc<CountryTable>>,
}

impl<F: Fetch> TariffClient<F> {
    /// Клиент без справочника: работают только цифровые коды стран и `cost`
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            countries: None,
        }
    }

    /// Подключить справочник стран
    pub fn with_countries(mut self, table: Arc<CountryTable>) -> Self {
        self.countries = Some(table);
        self
    }

    /// Справочник, если загружен
    pub fn countries(&self) -> Option<&CountryTable> {
        self.countries.as_deref()
    }

    /// Запрос к сервису и разбор ответа
    pub fn fetch_raw(&self, spec: &RequestSpec) -> Result<TariffResponse> {
        let url = spec.build_url()?;
        info!("requesting tariff: {url}");
        let body = self.fetcher.get(&url)?;
        debug!("tariff response: {body}");
        TariffResponse::from_json_str(&body)
    }

    /// Стоимость в рублях: с НДС (`paynds`) или без (`pay`)
    pub fn cost(&self, spec: &RequestSpec, include_tax: bool) -> Result<f64> {
        let key = if include_tax { "paynds" } else { "pay" };
        let kopecks = self.fetch_raw(spec)?.minor_units(key)?;
        Ok(kopecks / 100.0)
    }

    /// Запись справочника для страны назначения
    pub fn country_for(&self, spec: &RequestSpec) -> Result<&CountryRecord> {
        let code = spec
            .destination()
            .ok_or(TariffError::MissingRequiredField(RequiredField::Destination))?;
        let table = self.countries().ok_or(TariffError::MissingReferenceData)?;
        table
            .lookup_code_num(code)
            .ok_or_else(|| TariffError::UnsupportedDestination {
                destination: code.to_string(),
                field: "codeNum",
            })
    }

    /// Зона EMS страны назначения
    pub fn ems_zone(&self, spec: &RequestSpec) -> Result<u32> {
        self.country_field(spec, "emsZone", |r| r.ems_zone)
    }

    /// Минимальный срок доставки, дней
    pub fn min_days(&self, spec: &RequestSpec) -> Result<u32> {
        self.country_field(spec, "minDays", |r| r.min_days)
    }

    /// Максимальный срок доставки, дней
    pub fn max_days(&self, spec: &RequestSpec) -> Result<u32> {
        self.country_field(spec, "maxDays", |r| r.max_days)
    }

    fn country_field(
        &self,
        spec: &RequestSpec,
        field: &'static str,
        get: impl Fn(&CountryRecord) -> Option<u32>,
    ) -> Result<u32> {
        let record = self.country_for(spec).map_err(|e| match e {
            TariffError::UnsupportedDestination { destination, .. } => {
                TariffError::UnsupportedDestination { destination, field }
            }
            other => other,
        })?;
        get(record).ok_or_else(|| TariffError::UnsupportedDestination {
            destination: record.en_name.clone(),
            field,
        })
    }
}
