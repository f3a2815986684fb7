use super::catalog::{HeaderKind, PackageTier, ServiceCatalog, ServiceCategory, ServiceDefinition};
use std::collections::HashSet;

/// Resolves a header name into the services a selection under it may draw
/// from. Pure: output depends only on the catalogue and the name.
#[derive(Debug, Clone, Copy)]
pub struct PackageExpander<'a> {
    catalog: &'a ServiceCatalog,
}

impl PackageExpander<'static> {
    pub fn standard() -> Self {
        Self::new(ServiceCatalog::standard())
    }
}

impl<'a> PackageExpander<'a> {
    pub fn new(catalog: &'a ServiceCatalog) -> Self {
        Self { catalog }
    }

    pub fn is_package(&self, header: &str) -> bool {
        matches!(self.catalog.kind_of(header), HeaderKind::Package(_))
    }

    /// Services for `header`:
    /// - a package tier folds in every lower tier, ascending, first name wins;
    /// - a plain or add-on header returns its own list;
    /// - the customized header returns the whole catalogue, main services
    ///   first and add-ons after them.
    ///
    /// Names that are not catalogue headers expand to nothing.
    pub fn expand(&self, header: &str) -> Vec<ServiceDefinition> {
        let Some(definition) = self.catalog.header(header) else {
            return Vec::new();
        };

        match definition.kind {
            HeaderKind::Package(tier) => self.expand_tier(tier),
            HeaderKind::Plain | HeaderKind::Addon => definition.services.clone(),
            HeaderKind::Customized => self.expand_all(),
        }
    }

    /// Like [`Self::expand`], but unknown names are user-named customized
    /// headers and draw from the full catalogue.
    pub fn services_for_header(&self, header: &str) -> Vec<ServiceDefinition> {
        match self.catalog.header(header) {
            Some(_) => self.expand(header),
            None => self.expand_all(),
        }
    }

    fn expand_tier(&self, tier: PackageTier) -> Vec<ServiceDefinition> {
        let mut seen = HashSet::new();
        let mut services = Vec::new();

        for included in PackageTier::ordered().into_iter().filter(|t| *t <= tier) {
            let Some(header) = self.catalog.header(included.header_name()) else {
                continue;
            };
            for service in &header.services {
                if seen.insert(service.name.clone()) {
                    services.push(service.clone());
                }
            }
        }

        services
    }

    fn expand_all(&self) -> Vec<ServiceDefinition> {
        let mut seen = HashSet::new();
        let mut main = Vec::new();
        let mut addons = Vec::new();

        for header in self.catalog.headers() {
            let target = match header.kind {
                HeaderKind::Addon => &mut addons,
                HeaderKind::Customized => continue,
                HeaderKind::Plain | HeaderKind::Package(_) => &mut main,
            };
            for service in &header.services {
                if seen.insert(service.name.clone()) {
                    let mut service = service.clone();
                    if matches!(header.kind, HeaderKind::Addon) {
                        service.category = ServiceCategory::Addon;
                    }
                    target.push(service);
                }
            }
        }

        main.extend(addons);
        main
    }
}
