use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Deserializer};

use crate::error::{ReferenceDataError, Result, TariffError};

/// Запись справочника стран
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    /// название на русском
    #[serde(default)]
    pub ru_name: String,
    /// название на английском
    #[serde(default)]
    pub en_name: String,
    /// двухбуквенный код
    #[serde(default)]
    pub code2: String,
    /// трёхбуквенный код
    #[serde(default)]
    pub code3: String,
    /// цифровой код почты; отсутствует у стран, которых сервис не знает
    #[serde(default, deserialize_with = "opt_u32")]
    pub code_num: Option<u32>,
    /// зона EMS
    #[serde(default, deserialize_with = "opt_u32")]
    pub ems_zone: Option<u32>,
    /// минимальный срок доставки, дней
    #[serde(default, deserialize_with = "opt_u32")]
    pub min_days: Option<u32>,
    /// максимальный срок доставки, дней
    #[serde(default, deserialize_with = "opt_u32")]
    pub max_days: Option<u32>,
}

/// Текстовые поля, по которым ищем страну
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryField {
    /// `ruName`
    RuName,
    /// `enName`
    EnName,
    /// `code2`
    Code2,
    /// `code3`
    Code3,
}

impl CountryField {
    fn value_of(self, record: &CountryRecord) -> &str {
        match self {
            CountryField::RuName => &record.ru_name,
            CountryField::EnName => &record.en_name,
            CountryField::Code2 => &record.code2,
            CountryField::Code3 => &record.code3,
        }
    }
}

/// Справочник стран. После загрузки только читается.
///
/// Поиск линейный, в порядке файла; при дублях побеждает первая запись.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryTable {
    records: Vec<CountryRecord>,
}

impl CountryTable {
    /// Справочник из готовых записей
    pub fn new(records: Vec<CountryRecord>) -> Self {
        Self { records }
    }

    /// Чтение JSON-массива стран
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let records: Vec<CountryRecord> =
            serde_json::from_reader(BufReader::new(reader)).map_err(ReferenceDataError::from)?;
        debug!("loaded {} country records", records.len());
        Ok(Self { records })
    }

    /// Чтение JSON-массива стран из строки
    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Чтение справочника из файла.
    ///
    /// Отсутствующий файл — это [`TariffError::MissingReferenceData`], а не ошибка ввода-вывода:
    /// без справочника можно работать с цифровыми кодами стран.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(TariffError::MissingReferenceData);
            }
            Err(e) => {
                return Err(ReferenceDataError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
                .into());
            }
        };
        Self::from_reader(f)
    }

    /// Первая запись, у которой `field` в точности равно `value`
    pub fn lookup(&self, field: CountryField, value: &str) -> Option<&CountryRecord> {
        self.records.iter().find(|r| field.value_of(r) == value)
    }

    /// Первая запись с цифровым кодом `code`
    pub fn lookup_code_num(&self, code: u32) -> Option<&CountryRecord> {
        self.records.iter().find(|r| r.code_num == Some(code))
    }

    /// Число записей
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Пустой ли справочник
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Записи в порядке файла
    pub fn iter(&self) -> impl Iterator<Item = &CountryRecord> {
        self.records.iter()
    }
}

// В справочнике числа встречаются и как числа, и как строки
fn opt_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("not a number: {s:?}")))
        }
    }
}
