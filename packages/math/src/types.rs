use soroban_sdk::contracttype;

pub const DEPOSIT_L: usize = 0;
pub const DEPOSIT_X: usize = 1;
pub const DEPOSIT_Y: usize = 2;
pub const BORROW_L: usize = 3;
pub const BORROW_X: usize = 4;
pub const BORROW_Y: usize = 5;

/// Number of share ledgers per market
pub const SLOT_COUNT: usize = 6;

/// One of the six share ledgers of a market.
///
/// Indices 0-2 are credit slots, 3-5 are debt slots.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum TokenSlot {
    DepositL = 0,
    DepositX = 1,
    DepositY = 2,
    BorrowL = 3,
    BorrowX = 4,
    BorrowY = 5,
}

impl TokenSlot {
    pub const ALL: [TokenSlot; SLOT_COUNT] = [
        TokenSlot::DepositL,
        TokenSlot::DepositX,
        TokenSlot::DepositY,
        TokenSlot::BorrowL,
        TokenSlot::BorrowX,
        TokenSlot::BorrowY,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<TokenSlot> {
        Self::ALL.get(index).copied()
    }

    /// Debt slots round conversions up
    #[inline]
    pub fn is_debt(self) -> bool {
        self.index() >= BORROW_L
    }

    /// Deposit slot of the same asset for a debt slot and vice versa
    #[inline]
    pub fn counterpart(self) -> TokenSlot {
        Self::ALL[(self.index() + 3) % SLOT_COUNT]
    }
}
