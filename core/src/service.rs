//! Operations that combine the pure aggregate functions with a repository.

use quill_types::{BlueprintId, ContractId};

use crate::repository::Repository;
use crate::{Blueprint, Contract, ContractError, ValidationError, instantiate_contract};

/// Shown wherever a contract's blueprint can no longer be resolved.
pub const UNKNOWN_BLUEPRINT: &str = "Unknown Blueprint";

/// Validate and persist a blueprint. Nothing is written on failure.
pub fn save_blueprint<R>(repo: &mut R, blueprint: Blueprint) -> Result<Blueprint, ValidationError>
where
    R: Repository<Blueprint> + ?Sized,
{
    if let Err(err) = blueprint.validate() {
        tracing::warn!(blueprint = %blueprint.id(), %err, "Blueprint not saved");
        return Err(err);
    }
    tracing::debug!(blueprint = %blueprint.id(), fields = blueprint.fields().len(), "Blueprint saved");
    repo.put(blueprint.clone());
    Ok(blueprint)
}

/// Instantiate a stored blueprint as a new contract and persist it.
pub fn create_contract<B, C>(
    blueprints: &B,
    contracts: &mut C,
    blueprint_id: &BlueprintId,
    name: &str,
) -> Result<Contract, ContractError>
where
    B: Repository<Blueprint> + ?Sized,
    C: Repository<Contract> + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(ContractError::BlankContractName);
    }
    let blueprint = blueprints
        .get(blueprint_id)
        .ok_or_else(|| ContractError::UnknownBlueprint(blueprint_id.clone()))?;
    let contract = instantiate_contract(blueprint, name);
    tracing::debug!(contract = %contract.id(), blueprint = %blueprint_id, "Contract created");
    contracts.put(contract.clone());
    Ok(contract)
}

#[must_use]
pub fn find_blueprint_by_id<'a, R>(repo: &'a R, id: &BlueprintId) -> Option<&'a Blueprint>
where
    R: Repository<Blueprint> + ?Sized,
{
    repo.get(id)
}

#[must_use]
pub fn find_contract_by_id<'a, R>(repo: &'a R, id: &ContractId) -> Option<&'a Contract>
where
    R: Repository<Contract> + ?Sized,
{
    repo.get(id)
}

/// Name of the blueprint `id`, or [`UNKNOWN_BLUEPRINT`] if it is gone.
#[must_use]
pub fn blueprint_display_name<'a, R>(repo: &'a R, id: &BlueprintId) -> &'a str
where
    R: Repository<Blueprint> + ?Sized,
{
    repo.get(id).map_or(UNKNOWN_BLUEPRINT, Blueprint::name)
}

#[cfg(test)]
mod tests {
    use quill_types::{ContractStatus, Field, FieldId, FieldKind, Position};

    use super::*;
    use crate::repository::InMemoryRepository;

    fn nda() -> Blueprint {
        Blueprint::new(
            BlueprintId::new("bp1"),
            "NDA",
            vec![Field::new(
                FieldId::new("f1"),
                "Name",
                FieldKind::Text { required: false },
                Position::default(),
            )],
        )
    }

    #[test]
    fn invalid_blueprint_is_not_stored() {
        let mut repo = InMemoryRepository::new();
        let err = save_blueprint(&mut repo, Blueprint::create("Empty")).unwrap_err();
        assert_eq!(err, ValidationError::NoFields);
        assert!(repo.is_empty());
    }

    #[test]
    fn create_contract_from_saved_blueprint() {
        let mut blueprints = InMemoryRepository::new();
        let mut contracts = InMemoryRepository::new();
        save_blueprint(&mut blueprints, nda()).unwrap();

        let contract =
            create_contract(&blueprints, &mut contracts, &BlueprintId::new("bp1"), " Acme ")
                .unwrap();
        assert_eq!(contract.name(), "Acme");
        assert_eq!(contract.status(), ContractStatus::Created);
        assert_eq!(
            find_contract_by_id(&contracts, contract.id()).map(Contract::name),
            Some("Acme")
        );
    }

    #[test]
    fn create_contract_rejects_blank_name_and_unknown_blueprint() {
        let mut blueprints = InMemoryRepository::new();
        let mut contracts = InMemoryRepository::new();
        save_blueprint(&mut blueprints, nda()).unwrap();

        assert_eq!(
            create_contract(&blueprints, &mut contracts, &BlueprintId::new("bp1"), "  ")
                .unwrap_err(),
            ContractError::BlankContractName
        );
        assert_eq!(
            create_contract(&blueprints, &mut contracts, &BlueprintId::new("gone"), "X")
                .unwrap_err(),
            ContractError::UnknownBlueprint(BlueprintId::new("gone"))
        );
        assert!(contracts.is_empty());
    }

    #[test]
    fn missing_blueprint_displays_sentinel() {
        let mut repo = InMemoryRepository::new();
        save_blueprint(&mut repo, nda()).unwrap();
        assert_eq!(blueprint_display_name(&repo, &BlueprintId::new("bp1")), "NDA");
        assert_eq!(
            blueprint_display_name(&repo, &BlueprintId::new("gone")),
            UNKNOWN_BLUEPRINT
        );
        assert!(find_blueprint_by_id(&repo, &BlueprintId::new("gone")).is_none());
    }
}
