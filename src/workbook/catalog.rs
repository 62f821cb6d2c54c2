use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Separator between service and container in a rendered entry label.
pub const ENTRY_SEPARATOR: &str = ": ";

/// A single `(Service, Container Name)` row read from the source sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub service: String,
    pub container: String,
}

impl SourceRow {
    pub fn new(service: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            container: container.into(),
        }
    }
}

/// All container names belonging to one service, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceGroup {
    pub service: String,
    pub containers: Vec<String>,
}

/// Source rows grouped by service.
///
/// Groups are ordered by service name (code point order), independent of the
/// order in which services first appear in the workbook. Built once per load
/// and shared read-only between the selection screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    groups: Vec<ServiceGroup>,
}

impl ServiceCatalog {
    pub fn from_rows(rows: impl IntoIterator<Item = SourceRow>) -> Self {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in rows {
            grouped.entry(row.service).or_default().push(row.container);
        }

        let groups = grouped
            .into_iter()
            .map(|(service, containers)| ServiceGroup {
                service,
                containers,
            })
            .collect();

        Self { groups }
    }

    pub fn groups(&self) -> &[ServiceGroup] {
        &self.groups
    }

    /// Distinct service names in catalog order.
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.service.as_str())
    }

    pub fn containers_of(&self, service: &str) -> Option<&[String]> {
        self.groups
            .binary_search_by(|g| g.service.as_str().cmp(service))
            .ok()
            .map(|i| self.groups[i].containers.as_slice())
    }

    /// Concatenate the container entries of `services`, in the given order.
    ///
    /// Unknown services contribute nothing.
    pub fn entries_for<S: AsRef<str>>(&self, services: &[S]) -> Vec<ContainerEntry> {
        services
            .iter()
            .filter_map(|s| {
                let service = s.as_ref();
                self.containers_of(service).map(|containers| (service, containers))
            })
            .flat_map(|(service, containers)| {
                containers
                    .iter()
                    .map(move |container| ContainerEntry::new(service, container.clone()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A selectable `service: container` pair, also the shape of an exported row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerEntry {
    pub service: String,
    pub container: String,
}

impl ContainerEntry {
    pub fn new(service: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            container: container.into(),
        }
    }
}

impl fmt::Display for ContainerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ENTRY_SEPARATOR}{}", self.service, self.container)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("entry '{0}' has no ': ' separator")]
pub struct ParseEntryError(String);

impl FromStr for ContainerEntry {
    type Err = ParseEntryError;

    /// Splits on the first separator, so a service name must not contain it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_once(ENTRY_SEPARATOR)
            .map(|(service, container)| Self::new(service, container))
            .ok_or_else(|| ParseEntryError(s.to_string()))
    }
}
