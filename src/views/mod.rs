//! Vistas
//!
//! Plantillas Tera embebidas en el binario y el layout común (navegación +
//! toasts). Las vistas no tienen lógica: reciben lo que preparan los ViewModels.

pub mod navigation;

use serde::Serialize;
use tera::{Context, Tera};

use crate::utils::errors::AppResult;
use crate::viewmodels::Notification;

pub use navigation::{nav_items, NavItem, Page};

pub const BRAND: &str = "FleetLink";

/// Plantillas compiladas de la aplicación
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("../../templates/layout.html")),
            ("dashboard.html", include_str!("../../templates/dashboard.html")),
            ("add_vehicle.html", include_str!("../../templates/add_vehicle.html")),
            ("search_book.html", include_str!("../../templates/search_book.html")),
            ("bookings.html", include_str!("../../templates/bookings.html")),
            ("not_found.html", include_str!("../../templates/not_found.html")),
        ])?;
        Ok(Self { tera })
    }

    /// Renderizar una página dentro del layout
    pub fn render_page<T: Serialize>(
        &self,
        page: Page,
        current_path: &str,
        notifications: &[Notification],
        view: &T,
    ) -> AppResult<String> {
        let mut context = Context::from_serialize(view)?;
        context.insert("title", page.nav_label());
        self.render_in_layout(page.template(), current_path, notifications, context)
    }

    /// Renderizar una página estática (sin ViewModel)
    pub fn render_static(&self, page: Page, current_path: &str) -> AppResult<String> {
        let mut context = Context::new();
        context.insert("title", page.nav_label());
        self.render_in_layout(page.template(), current_path, &[], context)
    }

    pub fn render_not_found(&self, current_path: &str) -> AppResult<String> {
        let mut context = Context::new();
        context.insert("title", "Not Found");
        context.insert("path", current_path);
        self.render_in_layout("not_found.html", current_path, &[], context)
    }

    fn render_in_layout(
        &self,
        template: &str,
        current_path: &str,
        notifications: &[Notification],
        mut context: Context,
    ) -> AppResult<String> {
        context.insert("brand", BRAND);
        context.insert("nav", &nav_items(current_path));
        context.insert("notifications", notifications);
        Ok(self.tera.render(template, &context)?)
    }
}
