//! # Recipe/Menu Store
//!
//! Owns menus (each owning its recipes) and standalone recipes. Every write
//! that touches an ingredient line recosts the recipe and its owning menu
//! before returning, so derived costs are never stale. The store has no
//! internal locking; callers sharing it across tasks serialize access themselves.

use chrono::NaiveDate;
use log::{debug, info};

use crate::catalog::Catalog;
use crate::cost_engine::{recost_menu, recost_recipe};
use crate::errors::{KitchenError, KitchenResult};
use crate::recipe_model::{
    validate_amount, validate_scaling_factor, Menu, MenuId, NewRecipe, Recipe, RecipeId,
};

/// Where a recipe lives inside the store
#[derive(Debug, Clone, Copy)]
enum RecipeSlot {
    Standalone(usize),
    InMenu { menu: usize, recipe: usize },
}

#[derive(Debug, Default)]
pub struct MenuStore {
    menus: Vec<Menu>,
    standalone: Vec<Recipe>,
    next_menu_id: u64,
    next_recipe_id: u64,
}

impl MenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty menu; always succeeds
    pub fn create_menu(&mut self, name: &str, date: NaiveDate) -> &Menu {
        self.next_menu_id += 1;
        let id = MenuId(self.next_menu_id);
        info!("Creating menu {} '{}' for {}", id, name.trim(), date);
        self.menus.push(Menu::new(id, name, date));
        &self.menus[self.menus.len() - 1]
    }

    /// Create an empty recipe inside a menu
    pub fn create_recipe(&mut self, menu_id: MenuId, draft: NewRecipe) -> KitchenResult<&Recipe> {
        draft.validate()?;
        let menu_index = self.menu_index(menu_id)?;
        let id = self.allocate_recipe_id();

        info!("Creating recipe {} '{}' in menu {}", id, draft.name, menu_id);
        let menu = &mut self.menus[menu_index];
        menu.recipes.push(Recipe::from_draft(id, Some(menu_id), draft));
        recost_menu(menu);
        Ok(&menu.recipes[menu.recipes.len() - 1])
    }

    /// Create an empty recipe that belongs to no menu
    pub fn create_standalone_recipe(&mut self, draft: NewRecipe) -> KitchenResult<&Recipe> {
        draft.validate()?;
        let id = self.allocate_recipe_id();

        info!("Creating standalone recipe {} '{}'", id, draft.name);
        self.standalone.push(Recipe::from_draft(id, None, draft));
        Ok(&self.standalone[self.standalone.len() - 1])
    }

    /// Move a standalone recipe into a menu
    pub fn attach_recipe(&mut self, menu_id: MenuId, recipe_id: RecipeId) -> KitchenResult<&Menu> {
        let menu_index = self.menu_index(menu_id)?;
        let position = self
            .standalone
            .iter()
            .position(|recipe| recipe.id == recipe_id)
            .ok_or_else(|| KitchenError::recipe_not_found(recipe_id))?;

        let mut recipe = self.standalone.remove(position);
        recipe.menu_id = Some(menu_id);
        info!("Attaching recipe {} to menu {}", recipe_id, menu_id);

        let menu = &mut self.menus[menu_index];
        menu.recipes.push(recipe);
        recost_menu(menu);
        Ok(&*menu)
    }

    /// Set the amount of a catalog item in a menu's recipe
    ///
    /// Overwrites the amount when the recipe already uses the item, appends a
    /// new line otherwise, then recosts the recipe and the menu.
    ///
    /// # Errors
    ///
    /// `NotFound` if the menu is missing or does not own the recipe,
    /// `UnknownItem` if the catalog has no such item.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use menu_costing::catalog::Catalog;
    /// use menu_costing::recipe_model::NewRecipe;
    /// use menu_costing::store::MenuStore;
    ///
    /// let mut catalog = Catalog::new();
    /// catalog.enter("flour", 3.00, 5.0, "lbs", "Corner Market")?;
    ///
    /// let mut store = MenuStore::new();
    /// let menu_id = store.create_menu("Sunday", NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()).id;
    /// let draft = NewRecipe::new("Bread", "Mix the flour with water.", 2, "side");
    /// let recipe_id = store.create_recipe(menu_id, draft)?.id;
    ///
    /// let recipe = store.set_ingredient(&catalog, menu_id, recipe_id, "Flour", 2.0)?;
    /// assert!((recipe.derived_price() - 1.20).abs() < 1e-9);
    /// # Ok::<(), menu_costing::errors::KitchenError>(())
    /// ```
    pub fn set_ingredient(
        &mut self,
        catalog: &Catalog,
        menu_id: MenuId,
        recipe_id: RecipeId,
        item_name: &str,
        amount: f64,
    ) -> KitchenResult<&Recipe> {
        let menu_index = self.menu_index(menu_id)?;
        if self.menus[menu_index].recipe(recipe_id).is_none() {
            return Err(KitchenError::recipe_not_found(recipe_id));
        }
        self.set_recipe_ingredient(catalog, recipe_id, item_name, amount)
    }

    /// Same as [`MenuStore::set_ingredient`] but locates the recipe by id alone,
    /// so it also works on standalone recipes
    pub fn set_recipe_ingredient(
        &mut self,
        catalog: &Catalog,
        recipe_id: RecipeId,
        item_name: &str,
        amount: f64,
    ) -> KitchenResult<&Recipe> {
        let slot = self.locate(recipe_id)?;
        let item = catalog
            .lookup(item_name)
            .ok_or_else(|| KitchenError::UnknownItem(item_name.to_string()))?;
        validate_amount(amount)?;

        let key = item.key();
        debug!("Setting {} {} of '{}' in recipe {}", amount, item.unit, key, recipe_id);

        let recipe = self.recipe_at_mut(slot);
        recipe.upsert_line(key, amount);
        Ok(self.recost_slot(slot, catalog))
    }

    /// Change a recipe's scaling factor and recost it
    pub fn set_scaling_factor(
        &mut self,
        catalog: &Catalog,
        recipe_id: RecipeId,
        scaling_factor: f64,
    ) -> KitchenResult<&Recipe> {
        validate_scaling_factor(scaling_factor)?;
        let slot = self.locate(recipe_id)?;
        self.recipe_at_mut(slot).scaling_factor = scaling_factor;
        Ok(self.recost_slot(slot, catalog))
    }

    /// Replace a recipe's name, instructions, servings and dish type
    pub fn update_recipe_details(
        &mut self,
        recipe_id: RecipeId,
        draft: NewRecipe,
    ) -> KitchenResult<&Recipe> {
        draft.validate()?;
        let slot = self.locate(recipe_id)?;
        let recipe = self.recipe_at_mut(slot);
        recipe.apply_details(draft);
        Ok(&*recipe)
    }

    pub fn menu(&self, id: MenuId) -> Option<&Menu> {
        self.menus.iter().find(|menu| menu.id == id)
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.locate(id).ok().map(|slot| match slot {
            RecipeSlot::Standalone(index) => &self.standalone[index],
            RecipeSlot::InMenu { menu, recipe } => &self.menus[menu].recipes[recipe],
        })
    }

    pub fn standalone_recipes(&self) -> &[Recipe] {
        &self.standalone
    }

    pub(crate) fn menus_mut(&mut self) -> impl Iterator<Item = &mut Menu> {
        self.menus.iter_mut()
    }

    pub(crate) fn standalone_recipes_mut(&mut self) -> impl Iterator<Item = &mut Recipe> {
        self.standalone.iter_mut()
    }

    fn allocate_recipe_id(&mut self) -> RecipeId {
        self.next_recipe_id += 1;
        RecipeId(self.next_recipe_id)
    }

    fn menu_index(&self, id: MenuId) -> KitchenResult<usize> {
        self.menus
            .iter()
            .position(|menu| menu.id == id)
            .ok_or_else(|| KitchenError::menu_not_found(id))
    }

    fn locate(&self, id: RecipeId) -> KitchenResult<RecipeSlot> {
        if let Some(index) = self.standalone.iter().position(|recipe| recipe.id == id) {
            return Ok(RecipeSlot::Standalone(index));
        }
        self.menus
            .iter()
            .enumerate()
            .find_map(|(menu, m)| {
                m.recipes
                    .iter()
                    .position(|recipe| recipe.id == id)
                    .map(|recipe| RecipeSlot::InMenu { menu, recipe })
            })
            .ok_or_else(|| KitchenError::recipe_not_found(id))
    }

    fn recipe_at_mut(&mut self, slot: RecipeSlot) -> &mut Recipe {
        match slot {
            RecipeSlot::Standalone(index) => &mut self.standalone[index],
            RecipeSlot::InMenu { menu, recipe } => &mut self.menus[menu].recipes[recipe],
        }
    }

    /// Recost the recipe in `slot` and, for menu recipes, the owning menu
    fn recost_slot(&mut self, slot: RecipeSlot, catalog: &Catalog) -> &Recipe {
        match slot {
            RecipeSlot::Standalone(index) => {
                let recipe = &mut self.standalone[index];
                recost_recipe(recipe, catalog);
                &*recipe
            }
            RecipeSlot::InMenu { menu, recipe } => {
                let menu = &mut self.menus[menu];
                recost_recipe(&mut menu.recipes[recipe], catalog);
                recost_menu(menu);
                &menu.recipes[recipe]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.enter("flour", 3.00, 5.0, "lbs", "Market").unwrap();
        catalog.enter("milk", 2.00, 4.0, "cups", "Market").unwrap();
        catalog
    }

    fn draft(name: &str) -> NewRecipe {
        NewRecipe::new(name, "Mix flour and milk.", 4, "main")
    }

    #[test]
    fn test_create_menu_is_empty() {
        let mut store = MenuStore::new();
        let menu = store.create_menu("Weeknight", date());
        assert!(menu.recipes().is_empty());
        assert_eq!(menu.derived_cost(), 0.0);
        assert_eq!(menu.date, date());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = MenuStore::new();
        let a = store.create_menu("A", date()).id;
        let b = store.create_menu("B", date()).id;
        assert_ne!(a, b);

        let r1 = store.create_recipe(a, draft("one")).unwrap().id;
        let r2 = store.create_standalone_recipe(draft("two")).unwrap().id;
        let r3 = store.create_recipe(b, draft("three")).unwrap().id;
        assert_ne!(r1, r2);
        assert_ne!(r2, r3);
    }

    #[test]
    fn test_create_recipe_in_missing_menu() {
        let mut store = MenuStore::new();
        let result = store.create_recipe(MenuId(42), draft("orphan"));
        assert!(matches!(result, Err(KitchenError::NotFound { .. })));
    }

    #[test]
    fn test_set_ingredient_appends_then_overwrites() {
        let catalog = catalog();
        let mut store = MenuStore::new();
        let menu_id = store.create_menu("Brunch", date()).id;
        let recipe_id = store.create_recipe(menu_id, draft("Crepes")).unwrap().id;

        store.set_ingredient(&catalog, menu_id, recipe_id, "flour", 2.0).unwrap();
        store.set_ingredient(&catalog, menu_id, recipe_id, "MILK", 2.0).unwrap();
        let recipe = store
            .set_ingredient(&catalog, menu_id, recipe_id, "Flour", 1.0)
            .unwrap();

        assert_eq!(recipe.lines().len(), 2);
        assert_eq!(recipe.lines()[0].amount, 1.0);
        // 0.6 * 1 + 0.5 * 2
        assert!((recipe.derived_price() - 1.6).abs() < 1e-9);
        let menu = store.menu(menu_id).unwrap();
        assert!((menu.derived_cost() - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_set_ingredient_errors() {
        let catalog = catalog();
        let mut store = MenuStore::new();
        let menu_id = store.create_menu("Brunch", date()).id;
        let other_menu = store.create_menu("Dinner", date()).id;
        let recipe_id = store.create_recipe(menu_id, draft("Crepes")).unwrap().id;

        assert!(matches!(
            store.set_ingredient(&catalog, menu_id, recipe_id, "saffron", 1.0),
            Err(KitchenError::UnknownItem(_))
        ));
        assert!(matches!(
            store.set_ingredient(&catalog, other_menu, recipe_id, "flour", 1.0),
            Err(KitchenError::NotFound { .. })
        ));
        assert!(matches!(
            store.set_ingredient(&catalog, menu_id, RecipeId(99), "flour", 1.0),
            Err(KitchenError::NotFound { .. })
        ));
        assert!(matches!(
            store.set_ingredient(&catalog, menu_id, recipe_id, "flour", -1.0),
            Err(KitchenError::InvalidInput(_))
        ));
        assert!(store.recipe(recipe_id).unwrap().lines().is_empty());
    }

    #[test]
    fn test_standalone_recipe_then_attach() {
        let catalog = catalog();
        let mut store = MenuStore::new();
        let menu_id = store.create_menu("Brunch", date()).id;
        let recipe_id = store.create_standalone_recipe(draft("Porridge")).unwrap().id;

        let recipe = store
            .set_recipe_ingredient(&catalog, recipe_id, "milk", 4.0)
            .unwrap();
        assert!((recipe.derived_price() - 2.0).abs() < 1e-9);
        assert_eq!(recipe.menu_id, None);

        let menu = store.attach_recipe(menu_id, recipe_id).unwrap();
        assert_eq!(menu.recipes().len(), 1);
        assert!((menu.derived_cost() - 2.0).abs() < 1e-9);
        assert!(store.standalone_recipes().is_empty());
        assert_eq!(store.recipe(recipe_id).unwrap().menu_id, Some(menu_id));

        assert!(matches!(
            store.attach_recipe(menu_id, recipe_id),
            Err(KitchenError::NotFound { .. })
        ));
    }

    #[test]
    fn test_set_scaling_factor_recosts() {
        let catalog = catalog();
        let mut store = MenuStore::new();
        let menu_id = store.create_menu("Party", date()).id;
        let recipe_id = store.create_recipe(menu_id, draft("Crepes")).unwrap().id;
        store.set_ingredient(&catalog, menu_id, recipe_id, "flour", 2.0).unwrap();

        let recipe = store.set_scaling_factor(&catalog, recipe_id, 3.0).unwrap();
        assert!((recipe.derived_price() - 3.6).abs() < 1e-9);
        assert!((store.menu(menu_id).unwrap().derived_cost() - 3.6).abs() < 1e-9);

        assert!(store.set_scaling_factor(&catalog, recipe_id, 0.0).is_err());
    }

    #[test]
    fn test_update_recipe_details_keeps_lines() {
        let catalog = catalog();
        let mut store = MenuStore::new();
        let menu_id = store.create_menu("Party", date()).id;
        let recipe_id = store.create_recipe(menu_id, draft("Crepes")).unwrap().id;
        store.set_ingredient(&catalog, menu_id, recipe_id, "flour", 2.0).unwrap();

        let recipe = store
            .update_recipe_details(recipe_id, NewRecipe::new("Galettes", "Use flour.", 6, "main"))
            .unwrap();

        assert_eq!(recipe.name, "Galettes");
        assert_eq!(recipe.serving_quantity, 6);
        assert_eq!(recipe.lines().len(), 1);
    }
}
