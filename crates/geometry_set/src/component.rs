//! Geometry components and the attribute API they share.
//!
//! [`GeometryComponent`] is a closed enum over the three component kinds.
//! Each kind implements [`AttributeProvider`], the per-kind capability set;
//! the generic attribute operations on the enum (defaulting, domain
//! adaptation, type conversion, ensure-for-write) are written once on top
//! of it.

use std::collections::HashSet;
use std::fmt;

use geometry_attribute::{
    AttributeDomain, AttributeElement, AttributeError, AttributeInfo, AttributeType,
    AttributeValue, ReadAttribute, TypedReadAttribute, WriteAttribute,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::instances::InstancesComponent;
use crate::mesh_component::MeshComponent;
use crate::pointcloud::PointCloudComponent;

/// The kind of a geometry component. At most one component of each kind
/// lives in a geometry set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum GeometryComponentKind {
    Mesh,
    PointCloud,
    Instances,
}

impl GeometryComponentKind {
    pub const ALL: [GeometryComponentKind; 3] = [
        GeometryComponentKind::Mesh,
        GeometryComponentKind::PointCloud,
        GeometryComponentKind::Instances,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            GeometryComponentKind::Mesh => "Mesh",
            GeometryComponentKind::PointCloud => "PointCloud",
            GeometryComponentKind::Instances => "Instances",
        }
    }
}

impl fmt::Display for GeometryComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attribute capabilities of one component kind.
///
/// Implementors only answer for attributes in the form they are stored;
/// domain adaptation of stored data is the one conversion they provide.
pub trait AttributeProvider {
    fn domain_supported(&self, domain: AttributeDomain) -> bool;

    fn domain_with_type_supported(&self, domain: AttributeDomain, data_type: AttributeType)
    -> bool;

    /// Element count of `domain`, zero if the domain is unsupported.
    fn domain_size(&self, domain: AttributeDomain) -> usize;

    fn is_builtin(&self, name: &str) -> bool;

    /// Domain and type of an existing attribute.
    fn attribute_info(&self, name: &str) -> Option<AttributeInfo>;

    fn read(&self, name: &str) -> Option<ReadAttribute<'_>>;

    /// Mutable access. `None` if the attribute is missing or read-only.
    fn write(&mut self, name: &str) -> Option<WriteAttribute<'_>>;

    fn create(
        &mut self,
        name: &str,
        domain: AttributeDomain,
        data_type: AttributeType,
    ) -> Result<(), AttributeError>;

    fn delete(&mut self, name: &str) -> Result<(), AttributeError>;

    /// Names of every attribute, builtin or not.
    fn names(&self) -> Vec<String>;

    /// Move a non-constant attribute to another domain. Only the identity
    /// adaptation is available unless a kind overrides this.
    fn adapt_domain<'a>(
        &self,
        attribute: ReadAttribute<'a>,
        domain: AttributeDomain,
    ) -> Option<ReadAttribute<'a>> {
        (attribute.domain() == domain).then_some(attribute)
    }

    /// Returns `true` if the component holds no geometry.
    fn is_empty(&self) -> bool;
}

/// One kind-homogeneous chunk of geometry with its own attribute set.
///
/// `Clone` is a deep copy: the result owns its payload outright.
#[derive(Debug, Clone)]
pub enum GeometryComponent {
    Mesh(MeshComponent),
    PointCloud(PointCloudComponent),
    Instances(InstancesComponent),
}

impl GeometryComponent {
    /// A new, empty component of `kind`.
    #[must_use]
    pub fn create(kind: GeometryComponentKind) -> Self {
        match kind {
            GeometryComponentKind::Mesh => GeometryComponent::Mesh(MeshComponent::new()),
            GeometryComponentKind::PointCloud => {
                GeometryComponent::PointCloud(PointCloudComponent::new())
            }
            GeometryComponentKind::Instances => {
                GeometryComponent::Instances(InstancesComponent::new())
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> GeometryComponentKind {
        match self {
            GeometryComponent::Mesh(_) => GeometryComponentKind::Mesh,
            GeometryComponent::PointCloud(_) => GeometryComponentKind::PointCloud,
            GeometryComponent::Instances(_) => GeometryComponentKind::Instances,
        }
    }

    fn provider(&self) -> &dyn AttributeProvider {
        match self {
            GeometryComponent::Mesh(component) => component,
            GeometryComponent::PointCloud(component) => component,
            GeometryComponent::Instances(component) => component,
        }
    }

    fn provider_mut(&mut self) -> &mut dyn AttributeProvider {
        match self {
            GeometryComponent::Mesh(component) => component,
            GeometryComponent::PointCloud(component) => component,
            GeometryComponent::Instances(component) => component,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provider().is_empty()
    }

    #[must_use]
    pub fn attribute_exists(&self, name: &str) -> bool {
        self.provider().attribute_info(name).is_some()
    }

    /// Domain and type of the attribute called `name`.
    #[must_use]
    pub fn attribute_info(&self, name: &str) -> Option<AttributeInfo> {
        self.provider().attribute_info(name)
    }

    #[must_use]
    pub fn attribute_domain_supported(&self, domain: AttributeDomain) -> bool {
        self.provider().domain_supported(domain)
    }

    #[must_use]
    pub fn attribute_domain_with_type_supported(
        &self,
        domain: AttributeDomain,
        data_type: AttributeType,
    ) -> bool {
        self.provider().domain_with_type_supported(domain, data_type)
    }

    #[must_use]
    pub fn attribute_domain_size(&self, domain: AttributeDomain) -> usize {
        self.provider().domain_size(domain)
    }

    #[must_use]
    pub fn attribute_is_builtin(&self, name: &str) -> bool {
        self.provider().is_builtin(name)
    }

    /// The attribute in the domain and type it is stored with.
    #[must_use]
    pub fn attribute_try_get_for_read(&self, name: &str) -> Option<ReadAttribute<'_>> {
        let attribute = self.provider().read(name);
        trace!(
            kind = %self.kind(),
            name,
            found = attribute.is_some(),
            "attribute read"
        );
        attribute
    }

    /// The attribute interpolated onto `domain`.
    #[must_use]
    pub fn attribute_try_get_for_read_on(
        &self,
        name: &str,
        domain: AttributeDomain,
    ) -> Option<ReadAttribute<'_>> {
        let attribute = self.attribute_try_get_for_read(name)?;
        self.attribute_try_adapt_domain(attribute, domain)
    }

    /// The attribute interpolated onto `domain` and converted to `data_type`.
    #[must_use]
    pub fn attribute_try_get_for_read_as(
        &self,
        name: &str,
        domain: AttributeDomain,
        data_type: AttributeType,
    ) -> Option<ReadAttribute<'_>> {
        let attribute = self.attribute_try_get_for_read_on(name, domain)?;
        Some(attribute.convert(data_type))
    }

    /// Move `attribute` onto `domain`. Constant attributes stay constant.
    #[must_use]
    pub fn attribute_try_adapt_domain<'a>(
        &self,
        attribute: ReadAttribute<'a>,
        domain: AttributeDomain,
    ) -> Option<ReadAttribute<'a>> {
        if attribute.domain() == domain {
            return Some(attribute);
        }
        if !self.attribute_domain_supported(domain) {
            return None;
        }
        if attribute.is_constant() {
            return attribute.with_constant_domain(domain, self.attribute_domain_size(domain));
        }
        self.provider().adapt_domain(attribute, domain)
    }

    /// Like [`Self::attribute_try_get_for_read_as`], but falls back to a
    /// constant view of `default` when the attribute is missing or cannot be
    /// adapted.
    #[must_use]
    pub fn attribute_get_for_read(
        &self,
        name: &str,
        domain: AttributeDomain,
        data_type: AttributeType,
        default: AttributeValue,
    ) -> ReadAttribute<'_> {
        match self.attribute_try_get_for_read_as(name, domain, data_type) {
            Some(attribute) => attribute,
            None => self.attribute_get_constant_for_read(domain, data_type, default),
        }
    }

    /// Typed form of [`Self::attribute_get_for_read`].
    #[must_use]
    pub fn attribute_get_typed_for_read<T: AttributeElement>(
        &self,
        name: &str,
        domain: AttributeDomain,
        default: T,
    ) -> TypedReadAttribute<'_, T> {
        let len = self.attribute_domain_size(domain);
        self.attribute_get_for_read(name, domain, T::TYPE, default.into_value())
            .typed::<T>()
            .unwrap_or_else(|| TypedReadAttribute::constant(domain, default, len))
    }

    /// A view of `value` repeated once per element of `domain`.
    #[must_use]
    pub fn attribute_get_constant_for_read(
        &self,
        domain: AttributeDomain,
        data_type: AttributeType,
        value: AttributeValue,
    ) -> ReadAttribute<'static> {
        ReadAttribute::constant(
            domain,
            value.convert(data_type),
            self.attribute_domain_size(domain),
        )
    }

    /// Interpret `value` as `in_type`, then convert it to `out_type`.
    #[must_use]
    pub fn attribute_get_constant_for_read_converted(
        &self,
        domain: AttributeDomain,
        in_type: AttributeType,
        out_type: AttributeType,
        value: AttributeValue,
    ) -> ReadAttribute<'static> {
        self.attribute_get_constant_for_read(domain, out_type, value.convert(in_type))
    }

    /// Mutable access in the stored domain and type.
    #[must_use]
    pub fn attribute_try_get_for_write(&mut self, name: &str) -> Option<WriteAttribute<'_>> {
        self.provider_mut().write(name)
    }

    /// Add a custom attribute with default values.
    ///
    /// # Errors
    ///
    /// Fails for builtin or existing names and unsupported domain or type.
    pub fn attribute_try_create(
        &mut self,
        name: &str,
        domain: AttributeDomain,
        data_type: AttributeType,
    ) -> Result<(), AttributeError> {
        let kind = self.kind();
        self.provider_mut().create(name, domain, data_type)?;
        debug!(%kind, name, %domain, %data_type, "created attribute");
        Ok(())
    }

    /// Remove a custom attribute or vertex group.
    ///
    /// # Errors
    ///
    /// Fails for builtin or missing names.
    pub fn attribute_try_delete(&mut self, name: &str) -> Result<(), AttributeError> {
        let kind = self.kind();
        self.provider_mut().delete(name)?;
        debug!(%kind, name, "deleted attribute");
        Ok(())
    }

    /// Writable attribute with exactly this domain and type, replacing a
    /// mismatching custom attribute of the same name.
    ///
    /// Returns `None` if the name belongs to a builtin with a different
    /// signature or the attribute cannot be created.
    #[must_use]
    pub fn attribute_try_ensure_for_write(
        &mut self,
        name: &str,
        domain: AttributeDomain,
        data_type: AttributeType,
    ) -> Option<WriteAttribute<'_>> {
        match self.attribute_info(name) {
            Some(info) if info == AttributeInfo::new(domain, data_type) => {}
            Some(_) => {
                if self.attribute_is_builtin(name) {
                    return None;
                }
                self.attribute_try_delete(name).ok()?;
                self.attribute_try_create(name, domain, data_type).ok()?;
            }
            None => self.attribute_try_create(name, domain, data_type).ok()?,
        }
        self.attribute_try_get_for_write(name)
    }

    /// Names of every attribute on the component.
    #[must_use]
    pub fn attribute_names(&self) -> HashSet<String> {
        self.provider().names().into_iter().collect()
    }
}

/// Typed access to one variant of [`GeometryComponent`].
pub trait TypedComponent: Sized {
    const KIND: GeometryComponentKind;

    fn from_component(component: &GeometryComponent) -> Option<&Self>;

    fn from_component_mut(component: &mut GeometryComponent) -> Option<&mut Self>;
}

macro_rules! impl_typed_component {
    ($($Component:ty => $variant:ident),+ $(,)?) => {
        $(
            impl TypedComponent for $Component {
                const KIND: GeometryComponentKind = GeometryComponentKind::$variant;

                fn from_component(component: &GeometryComponent) -> Option<&Self> {
                    match component {
                        GeometryComponent::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_component_mut(component: &mut GeometryComponent) -> Option<&mut Self> {
                    match component {
                        GeometryComponent::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$Component> for GeometryComponent {
                fn from(component: $Component) -> Self {
                    GeometryComponent::$variant(component)
                }
            }
        )+
    };
}

impl_typed_component!(
    MeshComponent => Mesh,
    PointCloudComponent => PointCloud,
    InstancesComponent => Instances,
);
