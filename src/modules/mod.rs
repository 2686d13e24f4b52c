pub mod books;

use bookstore_kernel::ModuleRegistry;

use books::repository::SharedRepository;

/// Register every feature module with the registry
pub fn register_all(registry: &mut ModuleRegistry, books: SharedRepository) {
    registry.register(books::create_module(books));
}
