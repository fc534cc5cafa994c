use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Parser;

use tariff_core::constants::DEFAULT_COUNTRIES_FILE;
use tariff_core::{CountryTable, RequestSpec};

use crate::config;

/// Tariff - расчёт стоимости международного отправления Почтой России.
///
/// Собирает запрос к tariff.russianpost.ru, выполняет его и печатает стоимость.
/// С --ems-info дополнительно печатает зону EMS и сроки из справочника стран.
#[derive(Parser, Debug, Clone)]
#[command(name = "tariff", version, about)]
pub(crate) struct Args {
    /// Справочник стран (JSON). Если файла нет, принимаются только цифровые коды стран
    #[arg(long, env = "TARIFF_COUNTRIES", default_value = DEFAULT_COUNTRIES_FILE)]
    pub(crate) countries: PathBuf,

    /// Адрес сервиса расчёта вместо стандартного
    #[arg(long, env = "TARIFF_URL")]
    pub(crate) url: Option<String>,

    /// Таймаут HTTP-запроса, секунд
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    pub(crate) timeout_secs: u64,

    /// Тип отправления: PackageDeclaredValue (4021) или EMS (7031)
    #[arg(long = "type")]
    pub(crate) shipment_type: String,

    /// Вес, граммы
    #[arg(long)]
    pub(crate) weight: String,

    /// Страна: цифровой код, название на русском/английском, код из 2 или 3 букв
    #[arg(long)]
    pub(crate) destination: String,

    /// Авиадоставка (только для посылки с объявленной ценностью)
    #[arg(long)]
    pub(crate) avia: bool,

    /// Объявленная ценность, рубли
    #[arg(long)]
    pub(crate) declared_value: Option<String>,

    /// Дата расчёта, YYYY-MM-DD (по умолчанию сегодня)
    #[arg(long, conflicts_with = "no_date")]
    pub(crate) date: Option<NaiveDate>,

    /// Не передавать дату в запросе
    #[arg(long)]
    pub(crate) no_date: bool,

    /// Стоимость без НДС
    #[arg(long)]
    pub(crate) no_tax: bool,

    /// Только напечатать ссылку запроса, без обращения к сервису
    #[arg(long)]
    pub(crate) print_url: bool,

    /// Напечатать зону EMS и сроки доставки
    #[arg(long)]
    pub(crate) ems_info: bool,
}

impl Args {
    /// Проверки, которые clap не выражает
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url {
            if url.trim().is_empty() {
                bail!("--url is empty");
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("--url must start with http:// or https:// (got: {url})");
            }
        }
        if self.timeout_secs == 0 {
            bail!("--timeout-secs must be positive");
        }
        if self.destination.trim().is_empty() {
            bail!("--destination is empty");
        }
        Ok(())
    }

    /// Параметры запроса из аргументов
    pub(crate) fn request_spec(&self, countries: Option<&CountryTable>) -> Result<RequestSpec> {
        let mut spec = RequestSpec::new();

        spec.set_shipment_type(self.shipment_type.as_str())
            .context("--type")?;
        spec.set_weight(self.weight.as_str()).context("--weight")?;
        spec.set_destination(self.destination.as_str(), countries)
            .with_context(|| format!("--destination {}", self.destination))?;

        if self.avia {
            spec.set_avia(true)?;
        }
        if let Some(value) = &self.declared_value {
            spec.set_declared_value(value.as_str())
                .context("--declared-value")?;
        }
        if let Some(url) = &self.url {
            spec.set_base_url(url.as_str());
        }

        match (self.date, self.no_date) {
            (Some(date), _) => {
                spec.set_date(date);
            }
            (None, true) => {
                spec.clear_date();
            }
            (None, false) => {}
        }

        Ok(spec)
    }
}
