/**
 * API Route Table
 *
 * # Routes
 *
 * ## Boards
 * - `POST /api/boards` - create a board owned by the caller (201)
 * - `GET /api/boards` - boards the caller owns or has joined
 * - `GET /api/boards/{board_id}` - board with its lists and cards
 * - `PATCH /api/boards/{board_id}` - rename (owner only)
 * - `DELETE /api/boards/{board_id}` - delete with everything on it (owner only, 204)
 *
 * ## Lists
 * - `POST /api/boards/{board_id}/lists` - create (201)
 * - `GET /api/boards/{board_id}/lists` - lists in position order
 * - `PATCH /api/boards/{board_id}/lists/{list_id}` - rename
 * - `DELETE /api/boards/{board_id}/lists/{list_id}` - delete (204)
 * - `PATCH /api/boards/{board_id}/lists/{list_id}/reorder` - `{ "new_position" }`
 *
 * ## Cards
 * - `POST /api/lists/{list_id}/cards` - create (201)
 * - `GET /api/lists/{list_id}/cards` - cards in position order
 * - `PATCH /api/cards/{card_id}` - edit title or description
 * - `DELETE /api/cards/{card_id}` - delete (204)
 * - `PATCH /api/cards/{card_id}/move` - `{ "new_list_id", "new_position" }`
 *
 * ## Members
 * - `POST /api/boards/{board_id}/invite` - `{ "email" }` (owner only, 201)
 * - `POST /api/boards/{board_id}/invite/respond` - `{ "status" }`
 * - `GET /api/boards/{board_id}/members` - accepted members
 * - `GET /api/invitations/pending` - the caller's open invitations
 *
 * Every route requires the identity header.
 */

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::backend::routes::handlers;
use crate::backend::server::state::AppState;

/// Add the board, list, card and member routes to `router`.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Boards
        .route(
            "/api/boards",
            post(handlers::create_board).get(handlers::list_boards),
        )
        .route(
            "/api/boards/{board_id}",
            get(handlers::get_board)
                .patch(handlers::update_board)
                .delete(handlers::delete_board),
        )
        // Lists
        .route(
            "/api/boards/{board_id}/lists",
            post(handlers::create_list).get(handlers::board_lists),
        )
        .route(
            "/api/boards/{board_id}/lists/{list_id}",
            patch(handlers::update_list).delete(handlers::delete_list),
        )
        .route(
            "/api/boards/{board_id}/lists/{list_id}/reorder",
            patch(handlers::reorder_list),
        )
        // Cards
        .route(
            "/api/lists/{list_id}/cards",
            post(handlers::create_card).get(handlers::list_cards),
        )
        .route(
            "/api/cards/{card_id}",
            patch(handlers::update_card).delete(handlers::delete_card),
        )
        .route("/api/cards/{card_id}/move", patch(handlers::move_card))
        // Members
        .route("/api/boards/{board_id}/invite", post(handlers::invite_member))
        .route(
            "/api/boards/{board_id}/invite/respond",
            post(handlers::respond_to_invitation),
        )
        .route("/api/boards/{board_id}/members", get(handlers::board_members))
        .route("/api/invitations/pending", get(handlers::pending_invitations))
}
