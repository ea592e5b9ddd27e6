#![cfg(test)]

mod backup_e2e;
