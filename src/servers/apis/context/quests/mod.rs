//! Quests API context.
//!
//! A quest is a location-bound task with a reward. The creator is always the
//! authenticated caller, any `creatorId` in the request body is ignored.
//!
//! # Endpoints
//!
//! Method | Path | Auth | Success
//! ---|---|---|---
//! `POST` | `/quests` | yes | `201` `{message, questId}`
//! `GET` | `/quests` | no | `200` `[{id, ...fields}]`
//! `GET` | `/quests/{id}` | no | `200` `{id, ...fields}`
//! `DELETE` | `/quests/{id}` | creator | `200` `{message}`
//! `PATCH` | `/quests/{id}/accept` | yes | `200` `{message}`
//! `PATCH` | `/quests/{id}/abandon` | yes | `200` `{message}`
//! `PATCH` | `/quests/{id}/submit` | yes | `200` `{message, submission}`
//! `GET` | `/quests/{id}/submissions` | creator | `200` `[Submission]`
//! `PATCH` | `/quests/{id}/submissions/remove` | creator | `200` `{message, submissions}`
//! `POST` | `/quests/{id}/approve` | creator | `200` `{message, questId, approvedUserId, reward, creatorBonus}`
//!
//! # Create a quest
//!
//! ```bash
//! curl -X POST http://127.0.0.1:3000/quests \
//!   -H "Authorization: Bearer CreatorToken" \
//!   -H "Content-Type: application/json" \
//!   -d '{"name":"Find the Clock","radius":50,"reward":100,"type":"landmark","lat":-26.19,"lng":28.03,"imageUrl":"http://127.0.0.1:3000/blobs/images/c1/clock.png"}'
//! ```
//!
//! **Example response** `201`
//!
//! ```json
//! {"message":"Quest created","questId":"6b9f4c1ad5fb4b0d9bd1d0a3a6c3c5e7"}
//! ```
//!
//! `name` and a positive `radius` are required. `reward` defaults to `0`.
//! The location is stored only when both `lat` and `lng` are valid
//! coordinates.
//!
//! # Submit a proof of completion
//!
//! `PATCH /quests/{id}/submit` with `{"imageUrl": "...", "displayName": "..."}`.
//! A new submission replaces the caller's previous one.
//!
//! # Remove a submission
//!
//! `PATCH /quests/{id}/submissions/remove` with `{"index": 0}` or
//! `{"userId": "u2"}`. An index out of range gets a `400` response.
//!
//! # Approve a submission
//!
//! `POST /quests/{id}/approve` with `{"approvedUserId": "u2"}`. The approved
//! user gets the reward, the creator may get half of it, and the quest is
//! closed and deleted.
//!
//! # Close a quest
//!
//! `DELETE /quests/{id}` closes the quest without rewards. The quest is
//! removed from every user that accepted it and then deleted.
pub mod forms;
pub mod handlers;
pub mod responses;
pub mod routes;
