use bevy::prelude::*;

#[derive(Component)]
pub struct Ship;

#[derive(Component)]
pub struct ShipGlow;

#[derive(Component)]
pub struct ThrusterFlame;

#[derive(Component)]
pub struct PadSurface;

#[derive(Component)]
pub struct PadGlow;

#[derive(Component)]
pub struct SkylineBuilding(pub usize);

#[derive(Component)]
pub struct StarSprite(pub usize);
