// Two security tiers: public (no auth) and protected (bearer token + owner scope)
pub mod public;
pub mod protected;
