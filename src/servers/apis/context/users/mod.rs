//! Users API context.
//!
//! A user document holds the points, level, inventory, customisation and
//! journey progress of one player. Users can only read and change their own
//! document. The leaderboard is public.
//!
//! # Endpoints
//!
//! Method | Path | Auth | Success
//! ---|---|---|---
//! `POST` | `/users` | owner | `200` `{message}`
//! `GET` | `/users/{id}` | owner | `200` user document
//! `GET` | `/users/profile` | yes | `200` profile
//! `PATCH` | `/users/profile` | yes | `200` profile
//! `GET` | `/users/inventory` | yes | `200` `{spendablePoints, inventoryItems}`
//! `POST` | `/users/inventory/unlock` | yes | `200` `{spendablePoints, inventoryItems}`
//! `PATCH` | `/users/customisation` | yes | `200` `{customisation}`
//! `POST` | `/users/journey/start` | yes | `200` journey
//! `POST` | `/users/journey/advance` | yes | `200` journey
//! `POST` | `/users/journey/complete` | yes | `200` journey
//! `GET` | `/users/leaderboard?limit=N` | no | `200` `[{userId, name, leaderboardPoints, level}]`
//!
//! # Register a user
//!
//! ```bash
//! curl -X POST http://127.0.0.1:3000/users \
//!   -H "Authorization: Bearer PlayerToken" \
//!   -H "Content-Type: application/json" \
//!   -d '{"userId":"u1","email":"a@b.com","name":"A","role":"player"}'
//! ```
//!
//! `userId` must be the id of the caller, otherwise the response is `403`.
//! Registering again refreshes `Email`, `Name` and `Role` and keeps the rest.
//!
//! # Get a user document
//!
//! `GET /users/u1` returns the stored document with PascalCase fields:
//!
//! ```json
//! {
//!   "Email": "a@b.com",
//!   "Name": "A",
//!   "Role": "player",
//!   "Level": 0,
//!   "Experience": 0,
//!   "SpendablePoints": 0,
//!   "LeaderboardPoints": 0,
//!   "AcceptedQuests": [],
//!   "CompletedQuests": []
//! }
//! ```
//!
//! (Some fields omitted.)
//!
//! # Unlock an inventory item
//!
//! `POST /users/inventory/unlock` with `{"itemId": "hat", "cost": 50}`. It
//! fails with `400` if the item is already unlocked or the caller does not
//! have enough spendable points. Nothing changes on failure.
//!
//! # Journeys
//!
//! A journey walks the stops of one quest. `start` takes `{"questId": "..."}`
//! and sets the current stop to `1`, `advance` moves to the next stop and
//! `complete` records the quest as a completed journey. Every journey
//! endpoint returns:
//!
//! ```json
//! {"currentJourneyQuestId": "q1", "currentStop": 2, "completedJourneyQuests": []}
//! ```
//!
//! # Leaderboard
//!
//! `limit` defaults to `10` and is capped to `100`.
pub mod forms;
pub mod handlers;
pub mod responses;
pub mod routes;
