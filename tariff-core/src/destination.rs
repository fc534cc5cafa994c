use log::debug;

use crate::country::{CountryField, CountryRecord, CountryTable};
use crate::error::{Result, TariffError};

/// Приводит `token` к цифровому коду страны.
///
/// Пробелы по краям отбрасываются. Стратегии пробуются строго по порядку:
/// 1. число принимается без справочника и без проверки по нему; форма записи
///    нормализуется (`"0840"`, `"+840"`, `"840.0"` дают 840), дробные,
///    отрицательные и нулевые значения отвергаются;
/// 2. без справочника дальше идти нельзя;
/// 3. кириллица ищется только по `ruName`;
/// 4. иначе `enName`, затем `code3` (если длина 3), затем `code2` (если длина 2).
pub fn resolve(token: &str, table: Option<&CountryTable>) -> Result<u32> {
    let token = token.trim();

    if let Some(code) = parse_numeric(token)? {
        debug!("destination {token:?} taken as numeric code");
        return Ok(code);
    }

    let table = table.ok_or(TariffError::MissingReferenceData)?;

    if has_cyrillic(token) {
        return match table.lookup(CountryField::RuName, token) {
            Some(record) => code_of(record, token),
            None => Err(TariffError::InvalidDestination(token.to_string())),
        };
    }

    let len = token.chars().count();
    let strategies = [
        (CountryField::EnName, true),
        (CountryField::Code3, len == 3),
        (CountryField::Code2, len == 2),
    ];

    for (field, applicable) in strategies {
        if !applicable {
            continue;
        }
        if let Some(record) = table.lookup(field, token) {
            debug!("destination {token:?} matched by {field:?}");
            return code_of(record, token);
        }
    }

    Err(TariffError::InvalidDestination(token.to_string()))
}

fn code_of(record: &CountryRecord, token: &str) -> Result<u32> {
    record
        .code_num
        .ok_or_else(|| TariffError::UnsupportedDestination {
            destination: token.to_string(),
            field: "codeNum",
        })
}

/// `Ok(None)` — не число; число, не годное в код страны, — ошибка
fn parse_numeric(token: &str) -> Result<Option<u32>> {
    if token.is_empty() {
        return Err(TariffError::InvalidDestination(String::new()));
    }
    let Some(n) = token.parse::<f64>().ok().filter(|n| n.is_finite()) else {
        return Ok(None);
    };
    if n.fract() != 0.0 || n < 1.0 || n > f64::from(u32::MAX) {
        return Err(TariffError::InvalidDestination(token.to_string()));
    }
    Ok(Some(n as u32))
}

fn has_cyrillic(s: &str) -> bool {
    s.chars()
        .any(|c| matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё'))
}
