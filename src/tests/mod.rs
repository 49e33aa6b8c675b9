mod address;
mod commands;
mod stack;
mod urc;
