use std::fmt;

use fnv::FnvHashMap;
use itertools::Itertools;
use log::debug;

use generics::{TypedDict, TypedList};
use hostvm::cast::FromValue;
use hostvm::error::{ErrorCategory, ErrorKind, RuntimeError};
use hostvm::memory::MutatorView;
use hostvm::typename::TypeName;
use hostvm::value::Value;

/// Outcome of checking one value against a descriptor
pub struct Report {
    pub descriptor: String,
    pub found: &'static str,
    pub matches: bool,
    pub converted: Vec<String>,
    pub failure: Option<RuntimeError>,
}

impl Report {
    fn new(descriptor: String, value: &Value) -> Report {
        Report {
            descriptor,
            found: value.type_name(),
            matches: false,
            converted: Vec::new(),
            failure: None,
        }
    }

    // Conversion failures are part of the report, anything else is passed back up
    fn fail(&mut self, error: RuntimeError) -> Result<(), RuntimeError> {
        if error.category() == ErrorCategory::TypeConversion {
            self.failure = Some(error);
            Ok(())
        } else {
            Err(error)
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.matches {
            return write!(f, "{}: no match, found {}", self.descriptor, self.found);
        }

        write!(
            f,
            "{}: match, {} converted",
            self.descriptor,
            self.converted.len()
        )?;

        for (index, item) in self.converted.iter().enumerate() {
            write!(f, "\n  [{}] {}", index, item)?;
        }

        if let Some(ref error) = self.failure {
            write!(f, "\n  [{}] {}", self.converted.len(), error)?;
        }

        Ok(())
    }
}

pub type Checker = Box<dyn Fn(&MutatorView, &Value) -> Result<Report, RuntimeError>>;

fn check_list<T>(mem: &MutatorView, value: &Value) -> Result<Report, RuntimeError>
where
    T: FromValue + TypeName + fmt::Debug,
{
    let mut report = Report::new(TypedList::<T>::type_name(), value);
    if !TypedList::<T>::matches(value) {
        return Ok(report);
    }
    report.matches = true;

    let list = TypedList::<T>::from_value(mem, value)?;
    for item in list.iter(mem) {
        match item {
            Ok(element) => report.converted.push(format!("{:?}", element)),
            Err(e) => report.fail(e)?,
        }
    }

    Ok(report)
}

fn check_dict<K, V>(mem: &MutatorView, value: &Value) -> Result<Report, RuntimeError>
where
    K: FromValue + TypeName + fmt::Debug,
    V: FromValue + TypeName + fmt::Debug,
{
    let mut report = Report::new(TypedDict::<K, V>::type_name(), value);
    if !TypedDict::<K, V>::matches(value) {
        return Ok(report);
    }
    report.matches = true;

    let dict = TypedDict::<K, V>::from_value(mem, value)?;
    for item in dict.iter(mem) {
        match item {
            Ok((key, value)) => report.converted.push(format!("{:?}: {:?}", key, value)),
            Err(e) => report.fail(e)?,
        }
    }

    Ok(report)
}

struct Entry {
    descriptor: String,
    checker: Checker,
}

/// Descriptors are compared with all whitespace removed
fn normalize(descriptor: &str) -> String {
    descriptor.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Table of checkable generic signatures, keyed by descriptor
pub struct Signatures {
    table: FnvHashMap<String, Entry>,
}

impl Signatures {
    pub fn empty() -> Signatures {
        Signatures {
            table: FnvHashMap::default(),
        }
    }

    fn insert(&mut self, descriptor: String, checker: Checker) {
        debug!("registering signature {}", descriptor);
        self.table
            .insert(normalize(&descriptor), Entry { descriptor, checker });
    }

    pub fn register_list<T>(&mut self)
    where
        T: FromValue + TypeName + fmt::Debug + 'static,
    {
        self.insert(TypedList::<T>::type_name(), Box::new(check_list::<T>));
    }

    pub fn register_dict<K, V>(&mut self)
    where
        K: FromValue + TypeName + fmt::Debug + 'static,
        V: FromValue + TypeName + fmt::Debug + 'static,
    {
        self.insert(TypedDict::<K, V>::type_name(), Box::new(check_dict::<K, V>));
    }

    pub fn lookup(&self, descriptor: &str) -> Result<&Checker, RuntimeError> {
        self.table
            .get(&normalize(descriptor))
            .map(|entry| &entry.checker)
            .ok_or_else(|| RuntimeError::new(ErrorKind::UnknownType(String::from(descriptor))))
    }

    /// All registered descriptors, sorted
    pub fn descriptors(&self) -> Vec<&str> {
        self.table
            .values()
            .map(|entry| entry.descriptor.as_str())
            .sorted()
            .collect()
    }
}

impl Default for Signatures {
    fn default() -> Signatures {
        let mut signatures = Signatures::empty();

        signatures.register_list::<i64>();
        signatures.register_list::<f64>();
        signatures.register_list::<bool>();
        signatures.register_list::<String>();
        signatures.register_list::<Option<i64>>();
        signatures.register_list::<Value>();
        signatures.register_list::<TypedList<i64>>();
        signatures.register_list::<TypedList<String>>();

        signatures.register_dict::<String, i64>();
        signatures.register_dict::<String, String>();
        signatures.register_dict::<i64, String>();
        signatures.register_dict::<String, TypedList<i64>>();

        signatures
    }
}
