use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    book::{
        delete_book, register_book, search_books, show_book, show_book_list, show_categories,
        update_book,
    },
    borrow::{borrow_book, borrow_history, return_book},
    report::{library_report, overdue_records},
    reservation::{cancel_reservation, reservation_history, reserve_book},
    user::{current_user, show_user_list},
};

pub fn routes() -> Router<AppRegistry> {
    let books_routers = Router::new()
        .route("/", get(show_book_list).post(register_book))
        .route("/search", get(search_books))
        .route("/categories", get(show_categories))
        .route(
            "/:book_id",
            get(show_book).put(update_book).delete(delete_book),
        )
        .route("/:book_id/borrows", post(borrow_book))
        .route("/:book_id/borrows/returned", put(return_book))
        .route(
            "/:book_id/reservations",
            post(reserve_book).delete(cancel_reservation),
        );

    let borrows_routers = Router::new().route("/me", get(borrow_history));
    let reservations_routers = Router::new().route("/me", get(reservation_history));

    let users_routers = Router::new()
        .route("/", get(show_user_list))
        .route("/me", get(current_user));

    let admin_routers = Router::new()
        .route("/reports", get(library_report))
        .route("/borrows/overdue", get(overdue_records));

    let routers = Router::new()
        .nest("/books", books_routers)
        .nest("/borrows", borrows_routers)
        .nest("/reservations", reservations_routers)
        .nest("/users", users_routers)
        .nest("/admin", admin_routers);

    Router::new().nest("/api/v1", routers)
}
