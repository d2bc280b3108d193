use serde::Serialize;

/// Páginas de la aplicación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    AddVehicle,
    SearchBook,
    Bookings,
}

impl Page {
    pub const ALL: [Page; 4] = [Self::Dashboard, Self::AddVehicle, Self::SearchBook, Self::Bookings];

    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::AddVehicle => "/add-vehicle",
            Self::SearchBook => "/search-book",
            Self::Bookings => "/bookings",
        }
    }

    /// Texto del enlace en la barra de navegación
    pub fn nav_label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::AddVehicle => "Add Vehicle",
            Self::SearchBook => "Search & Book",
            Self::Bookings => "My Bookings",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Dashboard => "🏠",
            Self::AddVehicle => "➕",
            Self::SearchBook => "🔍",
            Self::Bookings => "📋",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard.html",
            Self::AddVehicle => "add_vehicle.html",
            Self::SearchBook => "search_book.html",
            Self::Bookings => "bookings.html",
        }
    }

    /// El dashboard solo está activo en `/`; el resto, por prefijo
    pub fn is_active(self, current_path: &str) -> bool {
        match self {
            Self::Dashboard => current_path == "/",
            _ => current_path.starts_with(self.path()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

pub fn nav_items(current_path: &str) -> Vec<NavItem> {
    Page::ALL
        .iter()
        .map(|page| NavItem {
            name: page.nav_label(),
            href: page.path(),
            icon: page.icon(),
            active: page.is_active(current_path),
        })
        .collect()
}
