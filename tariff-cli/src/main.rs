//! Точка входа `tariff`.
//!
//! Жизненный цикл:
//! - парсинг CLI и загрузка справочника стран (если файл есть)
//! - сборка параметров запроса
//! - `--print-url`: печать ссылки без обращения к сервису
//! - `--ems-info`: зона EMS и сроки из справочника, до обращения к сервису
//! - GET к сервису и печать стоимости

mod cli;
mod config;
mod http;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::info;

use tariff_core::TariffClient;

fn main() -> anyhow::Result<()> {
    // Логи через RUST_LOG=info/debug
    env_logger::init();

    let args = cli::Args::parse();
    args.validate()?;

    let countries = config::load_countries(&args.countries)?;
    let spec = args.request_spec(countries.as_deref())?;

    if args.print_url {
        println!("{}", spec.build_url()?);
        return Ok(());
    }

    info!(
        "Starting tariff: type={}, weight={}, destination={}",
        args.shipment_type, args.weight, args.destination
    );

    let fetcher = http::HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let mut client = TariffClient::new(fetcher);
    if let Some(table) = countries {
        client = client.with_countries(table);
    }

    // справочные данные сеть не требуют
    if args.ems_info {
        let country = client.country_for(&spec)?;
        println!("country: {} / {}", country.ru_name, country.en_name);
        println!("ems zone: {}", client.ems_zone(&spec)?);
        println!(
            "transit days: {}-{}",
            client.min_days(&spec)?,
            client.max_days(&spec)?
        );
    }

    let include_tax = !args.no_tax;
    let cost = client
        .cost(&spec, include_tax)
        .context("tariff calculation failed")?;
    let tax_note = if include_tax { "incl. VAT" } else { "excl. VAT" };
    println!("cost: {cost:.2} RUB ({tax_note})");

    Ok(())
}
