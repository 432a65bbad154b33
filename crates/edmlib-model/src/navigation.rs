//! Navigation properties and partner pairs

use crate::{
    BadElement, BadElementKind, EdmType, EntityType, StructuralProperty, TypeKind, TypeReference,
};
use edmlib_diagnostics::{EdmError, EdmlibError, ErrorCode, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};

/// How many entities a navigation reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Multiplicity {
    /// Not given by the caller; also the neutral value of a bad navigation property
    #[default]
    Unspecified,
    ZeroOrOne,
    One,
    Many,
}

impl Multiplicity {
    /// One or ZeroOrOne
    pub fn is_single(&self) -> bool {
        matches!(self, Self::One | Self::ZeroOrOne)
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Unspecified => "unspecified",
            Self::ZeroOrOne => "0..1",
            Self::One => "1",
            Self::Many => "*",
        };
        f.write_str(text)
    }
}

/// What happens to dependents when the principal is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OnDeleteAction {
    #[default]
    None,
    Cascade,
}

/// Caller-supplied description of a navigation property
///
/// Every field is optional so a partner description can be left partly or
/// wholly empty and filled with defaults.
#[derive(Debug, Clone, Default)]
pub struct NavigationPropertyInfo {
    pub name: Option<String>,
    pub target: Option<EdmType>,
    pub target_multiplicity: Multiplicity,
    pub contains_target: bool,
    pub on_delete: OnDeleteAction,
    pub dependent_properties: Vec<Arc<StructuralProperty>>,
    pub principal_properties: Vec<Arc<StructuralProperty>>,
}

impl NavigationPropertyInfo {
    /// Describe a navigation to `target`
    pub fn new(name: impl Into<String>, target: &Arc<EntityType>, target_multiplicity: Multiplicity) -> Self {
        Self {
            name: Some(name.into()),
            target: Some(EdmType::Entity(target.clone())),
            target_multiplicity,
            ..Default::default()
        }
    }

    pub fn with_contains_target(mut self, contains_target: bool) -> Self {
        self.contains_target = contains_target;
        self
    }

    pub fn with_on_delete(mut self, on_delete: OnDeleteAction) -> Self {
        self.on_delete = on_delete;
        self
    }

    /// Set the referential constraint: dependent properties on the declaring side
    /// paired with principal properties on the target
    pub fn with_referential_constraint(
        mut self,
        dependent: Vec<Arc<StructuralProperty>>,
        principal: Vec<Arc<StructuralProperty>>,
    ) -> Self {
        self.dependent_properties = dependent;
        self.principal_properties = principal;
        self
    }

    /// Fill what the caller left unspecified for the partner of `forward`
    fn with_partner_defaults(mut self, forward: &NavigationPropertyInfo, declaring: &Arc<EntityType>) -> Self {
        if self.name.is_none() {
            self.name = Some(format!("{}Partner", forward.name.as_deref().unwrap_or("")));
        }
        if self.target.is_none() {
            self.target = Some(EdmType::Entity(declaring.clone()));
        }
        if self.target_multiplicity == Multiplicity::Unspecified {
            self.target_multiplicity = Multiplicity::ZeroOrOne;
        }
        self
    }

    fn target_entity(&self) -> Result<Arc<EntityType>> {
        let name = self.name.as_deref().unwrap_or("");
        match &self.target {
            Some(EdmType::Entity(target)) => Ok(target.clone()),
            Some(other) => Err(EdmlibError::contract(
                ErrorCode::NAVIGATION_TARGET_NOT_ENTITY,
                format!("navigation property '{name}' targets {other}, which is not an entity type"),
            )),
            None => Err(EdmlibError::contract(
                ErrorCode::NAVIGATION_TARGET_NOT_ENTITY,
                format!("navigation property '{name}' has no target type"),
            )),
        }
    }

    fn check_multiplicity(&self) -> Result<()> {
        if self.target_multiplicity == Multiplicity::Unspecified {
            return Err(EdmlibError::contract(
                ErrorCode::UNSPECIFIED_MULTIPLICITY,
                format!(
                    "navigation property '{}' needs a target multiplicity",
                    self.name.as_deref().unwrap_or("")
                ),
            ));
        }
        Ok(())
    }
}

/// A property whose value is one or many entities of the target type
pub struct NavigationProperty {
    name: String,
    declaring_type: Weak<EntityType>,
    target: Weak<EntityType>,
    target_multiplicity: Multiplicity,
    contains_target: bool,
    on_delete: OnDeleteAction,
    dependent_properties: Vec<Arc<StructuralProperty>>,
    principal_properties: Vec<Arc<StructuralProperty>>,
    partner: Option<Weak<NavigationProperty>>,
    resolved_type: OnceCell<TypeReference>,
}

impl NavigationProperty {
    fn build(
        declaring_type: &Arc<EntityType>,
        target: &Arc<EntityType>,
        info: NavigationPropertyInfo,
        partner: Option<Weak<NavigationProperty>>,
    ) -> Self {
        Self {
            name: info.name.unwrap_or_default(),
            declaring_type: Arc::downgrade(declaring_type),
            target: Arc::downgrade(target),
            target_multiplicity: info.target_multiplicity,
            contains_target: info.contains_target,
            on_delete: info.on_delete,
            dependent_properties: info.dependent_properties,
            principal_properties: info.principal_properties,
            partner,
            resolved_type: OnceCell::new(),
        }
    }

    /// Create a navigation property without a partner
    pub(crate) fn create_unidirectional(
        declaring_type: &Arc<EntityType>,
        info: NavigationPropertyInfo,
    ) -> Result<Arc<Self>> {
        let target = info.target_entity()?;
        info.check_multiplicity()?;

        let property = Arc::new(Self::build(declaring_type, &target, info, None));
        log::debug!(
            "navigation {}.{} -> {}",
            declaring_type.full_name(),
            property.name,
            target.full_name()
        );
        Ok(property)
    }

    /// Create a navigation property and its partner, each pointing at the other
    ///
    /// Returns (forward, partner). The partner is declared on the forward target.
    pub(crate) fn create_bidirectional(
        declaring_type: &Arc<EntityType>,
        info: NavigationPropertyInfo,
        partner_info: Option<NavigationPropertyInfo>,
    ) -> Result<(Arc<Self>, Arc<Self>)> {
        let forward_target = info.target_entity()?;
        info.check_multiplicity()?;
        let partner_info = partner_info
            .unwrap_or_default()
            .with_partner_defaults(&info, declaring_type);
        let partner_target = partner_info.target_entity()?;

        let mut partner_slot = None;
        let forward = Arc::new_cyclic(|forward_ref| {
            let partner = Arc::new(Self::build(
                &forward_target,
                &partner_target,
                partner_info,
                Some(forward_ref.clone()),
            ));
            let forward = Self::build(declaring_type, &forward_target, info, Some(Arc::downgrade(&partner)));
            partner_slot = Some(partner);
            forward
        });
        let partner = partner_slot.ok_or_else(|| {
            EdmlibError::contract(
                ErrorCode::NAVIGATION_TARGET_NOT_ENTITY,
                format!("partner of navigation property '{}' was not created", forward.name),
            )
        })?;

        log::debug!(
            "navigation pair {}.{} <-> {}.{}",
            declaring_type.full_name(),
            forward.name,
            forward_target.full_name(),
            partner.name
        );
        Ok((forward, partner))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_type(&self) -> Option<Arc<EntityType>> {
        self.declaring_type.upgrade()
    }

    pub fn target_type(&self) -> Option<Arc<EntityType>> {
        self.target.upgrade()
    }

    pub fn target_multiplicity(&self) -> Multiplicity {
        self.target_multiplicity
    }

    pub fn contains_target(&self) -> bool {
        self.contains_target
    }

    pub fn on_delete(&self) -> OnDeleteAction {
        self.on_delete
    }

    pub fn dependent_properties(&self) -> &[Arc<StructuralProperty>] {
        &self.dependent_properties
    }

    pub fn principal_properties(&self) -> &[Arc<StructuralProperty>] {
        &self.principal_properties
    }

    /// The partner, if this property was created as half of a pair
    pub fn partner(&self) -> Option<Arc<NavigationProperty>> {
        self.partner.as_ref().and_then(Weak::upgrade)
    }

    /// Type of the property value, computed on first use
    ///
    /// Many gives a collection of the target, One a non-nullable reference and
    /// ZeroOrOne a nullable one. A target that has been dropped gives a bad type.
    pub fn type_ref(&self) -> TypeReference {
        self.resolved_type.get_or_init(|| self.compute_type()).clone()
    }

    fn compute_type(&self) -> TypeReference {
        let Some(target) = self.target.upgrade() else {
            return BadElement::new(
                BadElementKind::Type(TypeKind::Entity),
                [EdmError::new(
                    ErrorCode::BAD_NAVIGATION_TARGET,
                    format!("The target of navigation property '{}' is no longer available.", self.name),
                )],
            )
            .type_reference();
        };

        let entity = TypeReference::entity(&target, true);
        match self.target_multiplicity {
            Multiplicity::Many => entity.with_nullable(false).into_collection(),
            Multiplicity::One => entity.with_nullable(false),
            Multiplicity::ZeroOrOne | Multiplicity::Unspecified => entity,
        }
    }
}

impl fmt::Debug for NavigationProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationProperty")
            .field("name", &self.name)
            .field("target", &self.target.upgrade().map(|t| t.full_name()))
            .field("target_multiplicity", &self.target_multiplicity)
            .field("partner", &self.partner().map(|p| p.name.clone()))
            .finish()
    }
}
